//! Embed and extract operations against the remote service.
//!
//! An operation moves Idle -> InFlight -> Succeeded | Failed. All failure
//! modes (missing input, transport, remote error, malformed response) end
//! as a `Failed` state carrying a display string; none escape as errors.

mod controller;
mod request;
mod response;
mod transport;
mod types;

pub use controller::OperationController;
pub use request::{
    Algorithm, Credential, EmbedParams, ExtractParams, FormPart, MultipartForm, OperationRequest,
};
pub use response::{content_disposition_filename, decode_embed, decode_extract, ServiceResponse};
pub use transport::{HttpService, StegoService};
pub use types::{
    EmbedResult, ExtractedPayload, FailureReason, Operation, OperationKind, OperationResult,
    OperationState, OperationStatus,
};
