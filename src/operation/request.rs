//! Request construction: slot contents plus auxiliary form fields.

use crate::operation::types::{FailureReason, OperationKind};
use crate::slots::{FileSlots, SelectedFile, SlotRole};

/// Encryption applied by the service before embedding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Algorithm {
    /// Symmetric, keyed by a passphrase.
    Aes { password: String },
    /// Asymmetric, keyed by a PEM public key.
    Rsa { public_key_pem: String },
}

impl Algorithm {
    /// Value of the `algo` form field.
    pub fn selector(&self) -> &'static str {
        match self {
            Algorithm::Aes { .. } => "aes",
            Algorithm::Rsa { .. } => "rsa",
        }
    }
}

/// Secret needed to decrypt an extracted payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Credential {
    Password(String),
    PrivateKey(String),
}

/// Auxiliary fields for an embed submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmbedParams {
    pub algorithm: Algorithm,
}

/// Auxiliary fields for an extract submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractParams {
    pub credential: Credential,
}

/// A submission request of either kind.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OperationRequest {
    Embed(EmbedParams),
    Extract(ExtractParams),
}

impl OperationRequest {
    pub fn kind(&self) -> OperationKind {
        match self {
            OperationRequest::Embed(_) => OperationKind::Embed,
            OperationRequest::Extract(_) => OperationKind::Extract,
        }
    }

    /// Package the required slots and auxiliary fields.
    ///
    /// Fails with `MissingInput` naming the first empty required slot.
    pub fn build_form(&self, slots: &FileSlots) -> Result<MultipartForm, FailureReason> {
        let mut form = MultipartForm::default();
        match self {
            OperationRequest::Embed(params) => {
                form.push_file(SlotRole::Cover, required(slots, SlotRole::Cover)?);
                form.push_file(SlotRole::Secret, required(slots, SlotRole::Secret)?);
                form.push_text("algo", params.algorithm.selector());
                match &params.algorithm {
                    Algorithm::Aes { password } => form.push_text("password", password),
                    Algorithm::Rsa { public_key_pem } => {
                        form.push_text("rsa_public_pem", public_key_pem)
                    }
                }
            }
            OperationRequest::Extract(params) => {
                form.push_file(
                    SlotRole::StegoCarrier,
                    required(slots, SlotRole::StegoCarrier)?,
                );
                match &params.credential {
                    Credential::Password(password) => form.push_text("password", password),
                    Credential::PrivateKey(pem) => form.push_text("rsa_private_pem", pem),
                }
            }
        }
        Ok(form)
    }
}

fn required(slots: &FileSlots, role: SlotRole) -> Result<SelectedFile, FailureReason> {
    slots
        .current(role)
        .cloned()
        .ok_or(FailureReason::MissingInput(role))
}

/// One part of a multipart submission.
#[derive(Debug, Clone)]
pub enum FormPart {
    Text { name: &'static str, value: String },
    File { name: &'static str, file: SelectedFile },
}

impl FormPart {
    pub fn name(&self) -> &'static str {
        match self {
            FormPart::Text { name, .. } | FormPart::File { name, .. } => *name,
        }
    }
}

/// Transport-neutral description of a multipart body.
#[derive(Debug, Clone, Default)]
pub struct MultipartForm {
    parts: Vec<FormPart>,
}

impl MultipartForm {
    fn push_text(&mut self, name: &'static str, value: &str) {
        self.parts.push(FormPart::Text {
            name,
            value: value.to_string(),
        });
    }

    fn push_file(&mut self, role: SlotRole, file: SelectedFile) {
        self.parts.push(FormPart::File {
            name: role.field_name(),
            file,
        });
    }

    pub fn parts(&self) -> &[FormPart] {
        &self.parts
    }

    pub fn into_parts(self) -> Vec<FormPart> {
        self.parts
    }

    /// Value of a text field.
    pub fn text(&self, name: &str) -> Option<&str> {
        self.parts.iter().find_map(|part| match part {
            FormPart::Text { name: n, value } if *n == name => Some(value.as_str()),
            _ => None,
        })
    }

    /// File attached under `name`.
    pub fn file(&self, name: &str) -> Option<&SelectedFile> {
        self.parts.iter().find_map(|part| match part {
            FormPart::File { name: n, file } if *n == name => Some(file),
            _ => None,
        })
    }

    pub fn field_names(&self) -> Vec<&'static str> {
        self.parts.iter().map(FormPart::name).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn slots_with(roles: &[SlotRole]) -> FileSlots {
        let mut slots = FileSlots::new();
        for role in roles {
            let name = format!("{}.png", role.field_name());
            slots.select(*role, SelectedFile::with_guessed_type(name, vec![7; 4]));
        }
        slots
    }

    fn aes(password: &str) -> OperationRequest {
        OperationRequest::Embed(EmbedParams {
            algorithm: Algorithm::Aes {
                password: password.to_string(),
            },
        })
    }

    #[test]
    fn test_embed_aes_fields() {
        let slots = slots_with(&[SlotRole::Cover, SlotRole::Secret]);
        let form = aes("hunter2").build_form(&slots).unwrap();

        assert_eq!(form.field_names(), vec!["cover", "secret", "algo", "password"]);
        assert_eq!(form.text("algo"), Some("aes"));
        assert_eq!(form.text("password"), Some("hunter2"));
        assert_eq!(form.file("cover").unwrap().name(), "cover.png");
        assert!(form.text("rsa_public_pem").is_none());
    }

    #[test]
    fn test_embed_rsa_fields() {
        let slots = slots_with(&[SlotRole::Cover, SlotRole::Secret]);
        let request = OperationRequest::Embed(EmbedParams {
            algorithm: Algorithm::Rsa {
                public_key_pem: "-----BEGIN PUBLIC KEY-----".to_string(),
            },
        });
        let form = request.build_form(&slots).unwrap();

        assert_eq!(form.text("algo"), Some("rsa"));
        assert!(form.text("password").is_none());
        assert!(form.text("rsa_public_pem").unwrap().starts_with("-----BEGIN"));
    }

    #[test]
    fn test_embed_requires_cover_then_secret() {
        let err = aes("x").build_form(&FileSlots::new()).unwrap_err();
        assert_eq!(err, FailureReason::MissingInput(SlotRole::Cover));

        let err = aes("x")
            .build_form(&slots_with(&[SlotRole::Cover]))
            .unwrap_err();
        assert_eq!(err, FailureReason::MissingInput(SlotRole::Secret));
    }

    #[test]
    fn test_extract_fields() {
        let slots = slots_with(&[SlotRole::StegoCarrier]);
        let request = OperationRequest::Extract(ExtractParams {
            credential: Credential::PrivateKey("pem".to_string()),
        });
        let form = request.build_form(&slots).unwrap();

        assert_eq!(form.field_names(), vec!["stego", "rsa_private_pem"]);
        assert_eq!(request.kind(), OperationKind::Extract);
    }

    #[test]
    fn test_extract_ignores_embed_slots() {
        let slots = slots_with(&[SlotRole::Cover, SlotRole::Secret]);
        let request = OperationRequest::Extract(ExtractParams {
            credential: Credential::Password("pw".to_string()),
        });
        assert_eq!(
            request.build_form(&slots).unwrap_err(),
            FailureReason::MissingInput(SlotRole::StegoCarrier)
        );
    }
}
