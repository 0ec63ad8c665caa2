use serde::{Deserialize, Serialize};

use crate::error::{ChartError, ChartResult};

use super::PlotScheme;

pub const PLOT_SCHEME_JSON_SCHEMA_V1: u32 = 1;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlotSchemeJsonContractV1 {
    pub schema_version: u32,
    pub scheme: PlotScheme,
}

impl PlotScheme {
    pub fn to_json_contract_v1_pretty(&self) -> ChartResult<String> {
        let payload = PlotSchemeJsonContractV1 {
            schema_version: PLOT_SCHEME_JSON_SCHEMA_V1,
            scheme: self.clone(),
        };
        serde_json::to_string_pretty(&payload).map_err(|e| {
            ChartError::InvalidData(format!("failed to serialize plot scheme contract v1: {e}"))
        })
    }

    /// Parses either a versioned contract payload or a bare scheme object.
    ///
    /// The parsed scheme is validated before it is returned.
    pub fn from_json_compat_str(input: &str) -> ChartResult<Self> {
        let value: serde_json::Value = serde_json::from_str(input).map_err(|e| {
            ChartError::InvalidData(format!("failed to parse plot scheme json: {e}"))
        })?;

        let scheme = if value.get("schema_version").is_some() {
            let payload: PlotSchemeJsonContractV1 = serde_json::from_value(value).map_err(|e| {
                ChartError::InvalidData(format!("failed to parse plot scheme contract: {e}"))
            })?;
            if payload.schema_version != PLOT_SCHEME_JSON_SCHEMA_V1 {
                return Err(ChartError::InvalidData(format!(
                    "unsupported plot scheme schema version: {}",
                    payload.schema_version
                )));
            }
            payload.scheme
        } else {
            serde_json::from_value(value).map_err(|e| {
                ChartError::InvalidData(format!("failed to parse plot scheme: {e}"))
            })?
        };

        scheme.validate()?;
        Ok(scheme)
    }
}
