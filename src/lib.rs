//! Stegano Client
//!
//! Client-side controller for a remote steganography service. The service
//! does the actual hiding and recovery; this crate tracks which files the
//! user picked, estimates how much a cover image can hold, drives embed and
//! extract requests through their lifecycle, and turns outcomes into
//! something a user can act on.
//!
//! # Architecture
//!
//! ```text
//! FileSlots ──► CapacityEstimator            (cover only)
//!     │
//!     └──► OperationController ──► StegoService (HTTP)
//!                   │
//!                   └──► present() ──► download link / inline preview
//! ```
//!
//! # Example
//!
//! ```rust,no_run
//! use stegano_client::operation::{Algorithm, EmbedParams, HttpService, OperationController};
//! use stegano_client::slots::{FileSlots, SelectedFile, SlotRole};
//! use stegano_client::{present, ClientConfig};
//! use std::path::Path;
//!
//! # async fn run() -> stegano_client::Result<()> {
//! let mut slots = FileSlots::new();
//! slots.select(SlotRole::Cover, SelectedFile::from_path(Path::new("cover.png")).await?);
//! slots.select(SlotRole::Secret, SelectedFile::from_path(Path::new("notes.txt")).await?);
//!
//! let controller = OperationController::new(HttpService::new(ClientConfig::default())?);
//! let params = EmbedParams { algorithm: Algorithm::Aes { password: "hunter2".into() } };
//! let operation = controller.embed(&slots, params).await?;
//! println!("{:?}", present(&operation));
//! # Ok(())
//! # }
//! ```

pub mod capacity;
pub mod config;
pub mod error;
pub mod operation;
pub mod presenter;
pub mod session;
pub mod slots;

pub use capacity::{estimate, CapacityEstimate, CapacityTracker};
pub use config::ClientConfig;
pub use error::{Error, Result};
pub use operation::{Operation, OperationController, OperationKind};
pub use presenter::{present, Presentation};
pub use slots::{FileSlots, SelectedFile, SlotRole};
