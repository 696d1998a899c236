//! Operation controller: admission, dispatch, and response interpretation.

use crate::error::{Error, Result};
use crate::operation::request::{EmbedParams, ExtractParams, MultipartForm, OperationRequest};
use crate::operation::response::{decode_embed, decode_extract, ServiceResponse};
use crate::operation::transport::StegoService;
use crate::operation::types::{
    FailureReason, Operation, OperationKind, OperationResult, OperationState,
};
use crate::slots::FileSlots;
use std::future::Future;
use std::sync::{Mutex, MutexGuard};
use tracing::{debug, info, warn};

/// Per-kind bookkeeping.
#[derive(Debug)]
struct Track {
    /// Set while a request of this kind awaits its response.
    in_flight: bool,
    /// Sequence of the most recent submission or reset.
    sequence: u64,
    /// Visible operation for this kind.
    latest: Operation,
}

impl Track {
    fn new(kind: OperationKind) -> Self {
        Self {
            in_flight: false,
            sequence: 0,
            latest: Operation::idle(kind),
        }
    }
}

/// What admission decided for a submission.
enum Admission<'a, S: StegoService> {
    /// Local validation failed; nothing to send.
    Settled(Operation),
    /// Request must be sent.
    Dispatch {
        claim: InFlightClaim<'a, S>,
        form: MultipartForm,
    },
}

/// Ownership of a kind's in-flight flag for one dispatched submission.
///
/// Dropping the claim before [`InFlightClaim::complete`] runs releases the
/// kind, so a cancelled submit future cannot leave it busy.
struct InFlightClaim<'a, S: StegoService> {
    controller: &'a OperationController<S>,
    kind: OperationKind,
    sequence: u64,
    completed: bool,
}

impl<S: StegoService> InFlightClaim<'_, S> {
    fn complete(mut self, outcome: Result<ServiceResponse>) -> Operation {
        let operation = self.controller.complete(self.kind, self.sequence, outcome);
        self.completed = true;
        operation
    }
}

impl<S: StegoService> Drop for InFlightClaim<'_, S> {
    fn drop(&mut self) {
        if !self.completed {
            self.controller.abandon(self.kind, self.sequence);
        }
    }
}

/// Drives embed and extract operations against a [`StegoService`].
///
/// Embed and Extract are independent: one of each may be in flight at the
/// same time, but never two of the same kind.
pub struct OperationController<S> {
    service: S,
    tracks: Mutex<[Track; 2]>,
}

impl<S: StegoService> OperationController<S> {
    pub fn new(service: S) -> Self {
        Self {
            service,
            tracks: Mutex::new([
                Track::new(OperationKind::Embed),
                Track::new(OperationKind::Extract),
            ]),
        }
    }

    pub fn service(&self) -> &S {
        &self.service
    }

    fn tracks(&self) -> MutexGuard<'_, [Track; 2]> {
        // No invariant can be left half-updated by a panic here.
        self.tracks.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Submit an operation built from the current slot contents.
    ///
    /// Admission happens immediately, before the returned future is
    /// polled: slot contents are captured, and a second submission of the
    /// same kind is refused with [`Error::OperationInFlight`] until this one
    /// completes. Missing inputs settle as a failed operation without
    /// contacting the service. The returned operation is the terminal one
    /// for this submission, whether or not it is still the visible one.
    ///
    /// Dropping the returned future before it resolves abandons the
    /// submission: the kind accepts new submissions again and, if the
    /// abandoned one was still visible, the view returns to idle.
    pub fn submit<'a>(
        &'a self,
        slots: &FileSlots,
        request: OperationRequest,
    ) -> impl Future<Output = Result<Operation>> + Send + 'a {
        let kind = request.kind();
        let admission = self.admit(slots, &request);

        async move {
            match admission? {
                Admission::Settled(operation) => Ok(operation),
                Admission::Dispatch { claim, form } => {
                    let outcome = self.service.send(kind, form).await;
                    Ok(claim.complete(outcome))
                }
            }
        }
    }

    /// Submit an embed using the cover and secret slots.
    pub fn embed<'a>(
        &'a self,
        slots: &FileSlots,
        params: EmbedParams,
    ) -> impl Future<Output = Result<Operation>> + Send + 'a {
        self.submit(slots, OperationRequest::Embed(params))
    }

    /// Submit an extract using the stego carrier slot.
    pub fn extract<'a>(
        &'a self,
        slots: &FileSlots,
        params: ExtractParams,
    ) -> impl Future<Output = Result<Operation>> + Send + 'a {
        self.submit(slots, OperationRequest::Extract(params))
    }

    fn admit(&self, slots: &FileSlots, request: &OperationRequest) -> Result<Admission<'_, S>> {
        let kind = request.kind();
        let mut tracks = self.tracks();
        let track = &mut tracks[kind.index()];

        if track.in_flight {
            warn!(%kind, "submission refused, previous request still in flight");
            return Err(Error::OperationInFlight(kind));
        }

        track.sequence += 1;
        let sequence = track.sequence;

        match request.build_form(slots) {
            Ok(form) => {
                track.in_flight = true;
                track.latest = Operation {
                    kind,
                    sequence,
                    state: OperationState::InFlight,
                };
                info!(%kind, sequence, "operation submitted");
                let claim = InFlightClaim {
                    controller: self,
                    kind,
                    sequence,
                    completed: false,
                };
                Ok(Admission::Dispatch { claim, form })
            }
            Err(reason) => {
                info!(%kind, sequence, %reason, "operation rejected locally");
                let operation = Operation {
                    kind,
                    sequence,
                    state: OperationState::Failed(reason),
                };
                track.latest = operation.clone();
                Ok(Admission::Settled(operation))
            }
        }
    }

    fn complete(
        &self,
        kind: OperationKind,
        sequence: u64,
        outcome: Result<ServiceResponse>,
    ) -> Operation {
        let state = match outcome {
            Ok(response) => interpret(kind, response),
            Err(e) => OperationState::Failed(FailureReason::Transport(transport_detail(e))),
        };
        let operation = Operation {
            kind,
            sequence,
            state,
        };

        let mut tracks = self.tracks();
        let track = &mut tracks[kind.index()];
        track.in_flight = false;
        if track.sequence == sequence {
            info!(%kind, sequence, status = ?operation.status(), "operation finished");
            track.latest = operation.clone();
        } else {
            debug!(
                %kind,
                sequence,
                current = track.sequence,
                "discarding superseded response"
            );
        }
        operation
    }

    fn abandon(&self, kind: OperationKind, sequence: u64) {
        let mut tracks = self.tracks();
        let track = &mut tracks[kind.index()];
        track.in_flight = false;
        if track.sequence == sequence {
            track.latest = Operation {
                kind,
                sequence,
                state: OperationState::Idle,
            };
        }
        warn!(%kind, sequence, "submission dropped before its response arrived");
    }

    /// Visible operation for `kind`.
    pub fn current(&self, kind: OperationKind) -> Operation {
        self.tracks()[kind.index()].latest.clone()
    }

    /// Whether a request of `kind` is awaiting its response.
    ///
    /// Presentation layers disable the submit control while this is true.
    pub fn is_in_flight(&self, kind: OperationKind) -> bool {
        self.tracks()[kind.index()].in_flight
    }

    /// Return `kind` to idle.
    ///
    /// An in-flight request is not aborted; its eventual response is
    /// discarded instead of becoming visible, and the kind stays busy until
    /// that response arrives or its submit future is dropped.
    pub fn reset(&self, kind: OperationKind) {
        let mut tracks = self.tracks();
        let track = &mut tracks[kind.index()];
        track.sequence += 1;
        track.latest = Operation {
            kind,
            sequence: track.sequence,
            state: OperationState::Idle,
        };
        debug!(%kind, sequence = track.sequence, "operation reset");
    }
}

fn interpret(kind: OperationKind, response: ServiceResponse) -> OperationState {
    let decoded = match kind {
        OperationKind::Embed => decode_embed(&response).map(OperationResult::Embedded),
        OperationKind::Extract => decode_extract(response).map(OperationResult::Extracted),
    };
    match decoded {
        Ok(result) => OperationState::Succeeded(result),
        Err(reason) => OperationState::Failed(reason),
    }
}

fn transport_detail(error: Error) -> String {
    match error {
        Error::Transport(detail) => detail,
        other => other.to_string(),
    }
}
