//! Shared helpers for integration tests.

#![allow(dead_code)]

use async_trait::async_trait;
use image::{ImageFormat, RgbImage};
use std::collections::VecDeque;
use std::io::Cursor;
use std::sync::{Arc, Mutex};
use stegano_client::operation::{
    Algorithm, Credential, EmbedParams, ExtractParams, MultipartForm, OperationKind,
    ServiceResponse, StegoService,
};
use stegano_client::slots::{FileSlots, SelectedFile, SlotRole};
use stegano_client::Result;
use tokio::sync::Notify;

/// Service that replays scripted responses and records every call.
pub struct ScriptedService {
    responses: Mutex<VecDeque<Result<ServiceResponse>>>,
    calls: Mutex<Vec<(OperationKind, MultipartForm)>>,
    gate: Option<(OperationKind, Arc<Notify>)>,
}

impl ScriptedService {
    pub fn new(responses: Vec<Result<ServiceResponse>>) -> Self {
        Self {
            responses: Mutex::new(responses.into()),
            calls: Mutex::new(Vec::new()),
            gate: None,
        }
    }

    /// Requests of `kind` wait for `gate` before answering.
    pub fn gated(kind: OperationKind, gate: Arc<Notify>, responses: Vec<Result<ServiceResponse>>) -> Self {
        Self {
            gate: Some((kind, gate)),
            ..Self::new(responses)
        }
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    pub fn calls(&self) -> Vec<(OperationKind, MultipartForm)> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl StegoService for ScriptedService {
    async fn send(&self, kind: OperationKind, form: MultipartForm) -> Result<ServiceResponse> {
        self.calls.lock().unwrap().push((kind, form));
        if let Some((gated_kind, gate)) = &self.gate {
            if *gated_kind == kind {
                gate.notified().await;
            }
        }
        self.responses
            .lock()
            .unwrap()
            .pop_front()
            .expect("no scripted response left")
    }
}

/// Encode a blank RGB PNG.
pub fn png(width: u32, height: u32) -> Vec<u8> {
    let img = RgbImage::new(width, height);
    let mut out = Cursor::new(Vec::new());
    img.write_to(&mut out, ImageFormat::Png).unwrap();
    out.into_inner()
}

/// Slots filled for an embed.
pub fn embed_slots() -> FileSlots {
    let mut slots = FileSlots::new();
    slots.select(SlotRole::Cover, SelectedFile::new("cover.png", "image/png", png(32, 32)));
    slots.select(
        SlotRole::Secret,
        SelectedFile::new("notes.txt", "text/plain", b"meet at noon".to_vec()),
    );
    slots
}

/// Slots filled for an extract.
pub fn extract_slots() -> FileSlots {
    let mut slots = FileSlots::new();
    slots.select(
        SlotRole::StegoCarrier,
        SelectedFile::new("cover_stego.png", "image/png", png(32, 32)),
    );
    slots
}

pub fn aes(password: &str) -> EmbedParams {
    EmbedParams {
        algorithm: Algorithm::Aes {
            password: password.to_string(),
        },
    }
}

pub fn with_password(password: &str) -> ExtractParams {
    ExtractParams {
        credential: Credential::Password(password.to_string()),
    }
}
