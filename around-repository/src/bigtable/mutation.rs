//! Wire format of the `mutateRow` request.
//!
//! Bytes fields are base64 in the JSON mapping of the Data API and 64-bit
//! integers are decimal strings.

use base64::{engine::general_purpose::STANDARD, Engine as _};
use serde::{Deserialize, Serialize};

use around_shared::{PostId, PostRecord, WriteTime};

/// Body of a `mutateRow` call.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct MutateRowRequest {
    pub row_key: String,
    pub mutations: Vec<Mutation>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Mutation {
    pub set_cell: SetCell,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SetCell {
    pub family_name: String,
    pub column_qualifier: String,
    pub timestamp_micros: String,
    pub value: String,
}

impl MutateRowRequest {
    /// Build a single-row mutation setting every cell of `record` at `write_time`.
    pub fn from_record(row_key: &PostId, record: &PostRecord, write_time: WriteTime) -> Self {
        let timestamp_micros = write_time.as_micros().to_string();
        let mutations = record
            .cells
            .iter()
            .map(|cell| Mutation {
                set_cell: SetCell {
                    family_name: cell.family.clone(),
                    column_qualifier: STANDARD.encode(cell.qualifier.as_bytes()),
                    timestamp_micros: timestamp_micros.clone(),
                    value: STANDARD.encode(&cell.value),
                },
            })
            .collect();

        Self {
            row_key: STANDARD.encode(row_key.as_str().as_bytes()),
            mutations,
        }
    }
}
