//! Hub API operations: one async function per upstream call, each returning
//! its projected result.

pub mod dataflow;
pub mod deploy;
pub mod evaluation;
pub mod finetune_job;
pub mod repo;
pub mod resources;
pub mod space;
pub mod user;

use serde_json::{json, Value};

use crate::client::{Call, Endpoint, HubClient, Reply};
use crate::error::Result;
use crate::projection::{Envelope, Record};

/// Unwrap a [`Reply`], returning early with the failure record.
macro_rules! try_reply {
    ($expr:expr) => {
        match $expr {
            $crate::client::Reply::Ok(value) => value,
            $crate::client::Reply::Failed(error) => {
                return Ok($crate::client::Reply::Failed(error))
            }
        }
    };
}
pub(crate) use try_reply;

/// Page cursor forwarded verbatim to the hub.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Page {
    pub size: u64,
    pub number: u64,
}

impl Page {
    pub fn new(size: u64, number: u64) -> Self {
        Self { size, number }
    }
}

impl Default for Page {
    fn default() -> Self {
        Self::new(10, 1)
    }
}

/// Random four-digit suffix for generated job and deployment names.
pub(crate) fn random_suffix() -> String {
    let n = uuid::Uuid::new_v4().as_u128() % 10_000;
    format!("{n:04}")
}

/// `{<id_key>: id, msg}` acknowledgement for delete / start / stop calls.
pub(crate) fn acknowledge(id_key: &str, id: Value, envelope: &Envelope) -> Record {
    let mut out = Record::new();
    out.insert(id_key.to_string(), id);
    out.insert(
        "msg".to_string(),
        json!(envelope.message().unwrap_or("OK")),
    );
    out
}

/// Call an endpoint that only needs an acknowledgement.
pub(crate) async fn acknowledged(
    client: &HubClient,
    endpoint: &Endpoint,
    call: Call,
    id_key: &str,
    id: Value,
) -> Result<Reply<Record>> {
    let envelope = try_reply!(client.call(endpoint, call).await?);
    Ok(Reply::Ok(acknowledge(id_key, id, &envelope)))
}
