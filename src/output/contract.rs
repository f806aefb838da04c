//! JSON request/response contract for the calculator operations.
//!
//! An HTTP layer hands [`Handler::handle`] an operation name and a request
//! body and gets back either a JSON response document or a [`ContractError`]
//! carrying the status code and `detail` message to return.

use crate::error::SubnetError;
use crate::models::{parse_network, CloudMode, IpFamily};
use crate::processing::{
    classify_cloudflare_network, classify_private_network, compute_subnet_info, validate,
    CloudflareResult, PrivacyResult, SubnetInfo, ValidationResult,
};
use crate::ranges::{cloudflare_builtin, RangeTable};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Errors returned to the caller of [`Handler::handle`].
#[derive(Debug, Error)]
pub enum ContractError {
    /// Well-formed request with an unusable address, network or mode.
    #[error("{0}")]
    BadRequest(String),
    #[error("Unknown operation '{0}'")]
    UnknownOperation(String),
    /// Body missing a field or not valid JSON.
    #[error("Invalid request body at {path}: {message}")]
    InvalidBody { path: String, message: String },
    #[error("Error serializing response: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl ContractError {
    /// HTTP status code for this error.
    pub fn status_code(&self) -> u16 {
        match self {
            ContractError::BadRequest(_) => 400,
            ContractError::UnknownOperation(_) => 404,
            ContractError::InvalidBody { .. } => 422,
            ContractError::Serialization(_) => 500,
        }
    }

    /// The error body, `{"detail": "..."}`.
    pub fn to_json(&self) -> String {
        serde_json::json!({ "detail": self.to_string() }).to_string()
    }
}

/// The operations [`Handler::handle`] dispatches on.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Operation {
    Validate,
    CheckPrivate,
    CheckCloudflare,
    SubnetInfo,
}

impl Operation {
    pub const ALL: [Operation; 4] = [
        Operation::Validate,
        Operation::CheckPrivate,
        Operation::CheckCloudflare,
        Operation::SubnetInfo,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Operation::Validate => "validate",
            Operation::CheckPrivate => "check-private",
            Operation::CheckCloudflare => "check-cloudflare",
            Operation::SubnetInfo => "subnet-info",
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Operation {
    type Err = ContractError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Operation::ALL
            .into_iter()
            .find(|op| op.as_str() == s)
            .ok_or_else(|| ContractError::UnknownOperation(s.to_string()))
    }
}

/// Body of validate, check-private and check-cloudflare.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct AddressRequest {
    pub address: String,
}

/// Body of subnet-info. Without `mode` the handler's default mode is used.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SubnetInfoRequest {
    pub network: String,
    #[serde(default)]
    pub mode: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PrivacyResponse {
    /// The request address, as given.
    pub address: String,
    #[serde(flatten)]
    pub result: PrivacyResult,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CloudflareResponse {
    /// The request address, as given.
    pub address: String,
    #[serde(flatten)]
    pub result: CloudflareResult,
}

/// Stateless dispatcher over a fixed Cloudflare table and default mode.
#[derive(Debug, Clone)]
pub struct Handler {
    cloudflare: RangeTable,
    default_mode: CloudMode,
}

impl Default for Handler {
    fn default() -> Self {
        Handler::new(cloudflare_builtin().clone(), CloudMode::Azure)
    }
}

impl Handler {
    pub fn new(cloudflare: RangeTable, default_mode: CloudMode) -> Handler {
        Handler {
            cloudflare,
            default_mode,
        }
    }

    pub fn cloudflare_table(&self) -> &RangeTable {
        &self.cloudflare
    }

    pub fn default_mode(&self) -> CloudMode {
        self.default_mode
    }

    /// Run `operation` on the JSON `body` and return the JSON response.
    ///
    /// # Arguments
    /// * `operation` - One of `validate`, `check-private`, `check-cloudflare`, `subnet-info`
    /// * `body` - The JSON request body
    ///
    /// # Returns
    /// The serialized response. Counts above `u64::MAX` stay JSON integers,
    /// `serde_json::Value` cannot hold them.
    pub fn handle(&self, operation: &str, body: &str) -> Result<String, ContractError> {
        let operation: Operation = operation.parse()?;
        log::debug!("handle({operation}) body={body}");

        let response = match operation {
            Operation::Validate => serde_json::to_string(&self.validate(&parse_body(body)?)?)?,
            Operation::CheckPrivate => {
                serde_json::to_string(&self.check_private(&parse_body(body)?)?)?
            }
            Operation::CheckCloudflare => {
                serde_json::to_string(&self.check_cloudflare(&parse_body(body)?)?)?
            }
            Operation::SubnetInfo => {
                serde_json::to_string(&self.subnet_info(&parse_body(body)?)?)?
            }
        };
        Ok(response)
    }

    /// Invalid input is a 400 here, unlike [`validate`] itself.
    pub fn validate(&self, request: &AddressRequest) -> Result<ValidationResult, ContractError> {
        let result = validate(&request.address);
        if result.valid {
            return Ok(result);
        }
        let detail = if request.address.contains('/') {
            "Invalid IP network format"
        } else {
            "Invalid IP address format"
        };
        Err(ContractError::BadRequest(detail.to_string()))
    }

    /// IPv4 only; IPv6 input is rejected with a 400.
    pub fn check_private(&self, request: &AddressRequest) -> Result<PrivacyResponse, ContractError> {
        let network = parse_network(&request.address).map_err(|e| {
            ContractError::BadRequest(format!("Invalid IP address or network: {e}"))
        })?;
        if network.family() == IpFamily::V6 {
            return Err(ContractError::BadRequest(
                "This endpoint only supports IPv4 addresses".to_string(),
            ));
        }
        Ok(PrivacyResponse {
            address: request.address.clone(),
            result: classify_private_network(&network),
        })
    }

    pub fn check_cloudflare(
        &self,
        request: &AddressRequest,
    ) -> Result<CloudflareResponse, ContractError> {
        let network = parse_network(&request.address).map_err(|e| {
            ContractError::BadRequest(format!("Invalid IP address or network: {e}"))
        })?;
        Ok(CloudflareResponse {
            address: request.address.clone(),
            result: classify_cloudflare_network(&network, &self.cloudflare),
        })
    }

    pub fn subnet_info(&self, request: &SubnetInfoRequest) -> Result<SubnetInfo, ContractError> {
        let mode = match &request.mode {
            Some(mode) => mode
                .parse::<CloudMode>()
                .map_err(|e| ContractError::BadRequest(e.to_string()))?,
            None => self.default_mode,
        };
        compute_subnet_info(&request.network, mode).map_err(|e| match e {
            SubnetError::Address(e) => {
                ContractError::BadRequest(format!("Invalid network format: {e}"))
            }
            SubnetError::InvalidMode(e) => ContractError::BadRequest(e.to_string()),
        })
    }
}

fn parse_body<T: DeserializeOwned>(body: &str) -> Result<T, ContractError> {
    let mut deserializer = serde_json::Deserializer::from_str(body);
    serde_path_to_error::deserialize(&mut deserializer).map_err(|e| ContractError::InvalidBody {
        path: e.path().to_string(),
        message: e.inner().to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::{json, Value};
    use test_case::test_case;

    fn call(operation: &str, body: Value) -> Result<Value, ContractError> {
        let response = Handler::default().handle(operation, &body.to_string())?;
        Ok(serde_json::from_str(&response).unwrap())
    }

    fn call_err(operation: &str, body: Value) -> ContractError {
        call(operation, body).unwrap_err()
    }

    #[test]
    fn test_operation_names() {
        for op in Operation::ALL {
            assert_eq!(op.as_str().parse::<Operation>().unwrap(), op);
        }
        assert!(matches!(
            "subnets".parse::<Operation>(),
            Err(ContractError::UnknownOperation(_))
        ));
    }

    #[test]
    fn test_validate_address() {
        let response = call("validate", json!({"address": "192.168.1.1"})).unwrap();
        assert_eq!(
            response,
            json!({"valid": true, "type": "address", "address": "192.168.1.1", "is_ipv4": true, "is_ipv6": false})
        );
    }

    #[test_case("192.168.1.0/33", "Invalid IP network format")]
    #[test_case("192.168.1.256", "Invalid IP address format")]
    fn test_validate_rejects(address: &str, detail: &str) {
        let err = call_err("validate", json!({ "address": address }));
        assert_eq!(err.status_code(), 400);
        assert_eq!(err.to_string(), detail);
        assert_eq!(err.to_json(), json!({ "detail": detail }).to_string());
    }

    #[test]
    fn test_check_private() {
        let response = call("check-private", json!({"address": "192.168.1.1"})).unwrap();
        assert_eq!(
            response,
            json!({
                "address": "192.168.1.1",
                "is_rfc1918": true,
                "is_rfc6598": false,
                "matched_rfc1918_range": "192.168.0.0/16"
            })
        );

        let response = call("check-private", json!({"address": "100.64.0.0/16"})).unwrap();
        assert_eq!(response["is_rfc6598"], true);
        assert_eq!(response["matched_rfc6598_range"], "100.64.0.0/10");
    }

    #[test]
    fn test_check_private_rejects_ipv6() {
        let err = call_err("check-private", json!({"address": "fd00::1"}));
        assert_eq!(err.status_code(), 400);
        assert_eq!(err.to_string(), "This endpoint only supports IPv4 addresses");
    }

    #[test]
    fn test_check_private_rejects_garbage() {
        let err = call_err("check-private", json!({"address": "10.0.0.0/40"}));
        assert_eq!(err.status_code(), 400);
        assert!(err.to_string().starts_with("Invalid IP address or network: "));
    }

    #[test]
    fn test_check_cloudflare() {
        let response = call("check-cloudflare", json!({"address": "104.16.1.1"})).unwrap();
        assert_eq!(
            response,
            json!({
                "address": "104.16.1.1",
                "is_cloudflare": true,
                "ip_version": 4,
                "matched_ranges": ["104.16.0.0/13"]
            })
        );

        let response = call("check-cloudflare", json!({"address": "8.8.8.8"})).unwrap();
        assert_eq!(response["is_cloudflare"], false);
        assert_eq!(response["matched_ranges"], json!([]));
    }

    #[test]
    fn test_subnet_info_default_mode() {
        let response = call("subnet-info", json!({"network": "192.168.1.0/24"})).unwrap();
        assert_eq!(response["mode"], "Azure");
        assert_eq!(response["usable_addresses"], 251);
        assert_eq!(response["broadcast_address"], "192.168.1.255");
        assert!(response.get("note").is_none());
    }

    #[test]
    fn test_subnet_info_ipv6() {
        let response =
            call("subnet-info", json!({"network": "2001:db8::/112", "mode": "Standard"})).unwrap();
        assert_eq!(response["broadcast_address"], Value::Null);
        assert_eq!(response["total_addresses"], 65536);
        assert_eq!(response["usable_addresses"], 65536);
    }

    #[test]
    fn test_subnet_info_large_counts_are_integers() {
        let body = json!({"network": "2001:db8::/32", "mode": "Standard"}).to_string();
        let response = Handler::default().handle("subnet-info", &body).unwrap();
        assert!(response.contains(r#""total_addresses":79228162514264337593543950336"#));

        let body = json!({"network": "::/0"}).to_string();
        let response = Handler::default().handle("subnet-info", &body).unwrap();
        assert!(response
            .contains(r#""total_addresses":"340282366920938463463374607431768211456""#));
    }

    #[test]
    fn test_subnet_info_bad_mode() {
        let err = call_err("subnet-info", json!({"network": "10.0.0.0/24", "mode": "azure"}));
        assert_eq!(err.status_code(), 400);
        assert_eq!(
            err.to_string(),
            "Invalid mode 'azure'. Must be one of: Azure, AWS, OCI, Standard"
        );
    }

    #[test]
    fn test_subnet_info_bad_network() {
        let err = call_err("subnet-info", json!({"network": "10.0.0.0/abc"}));
        assert_eq!(err.status_code(), 400);
        assert!(err.to_string().starts_with("Invalid network format: "));
    }

    #[test]
    fn test_missing_field_is_422() {
        let err = call_err("subnet-info", json!({"address": "10.0.0.0/24"}));
        assert_eq!(err.status_code(), 422);
        assert!(err.to_string().contains("missing field `network`"), "{err}");

        let err = Handler::default().handle("validate", "not json").unwrap_err();
        assert_eq!(err.status_code(), 422);
    }

    #[test]
    fn test_wrong_field_type_reports_path() {
        let err = call_err("validate", json!({"address": 42}));
        match err {
            ContractError::InvalidBody { path, .. } => assert_eq!(path, "address"),
            other => panic!("unexpected error {other:?}"),
        }
    }

    #[test]
    fn test_unknown_operation_is_404() {
        let err = call_err("subnets", json!({}));
        assert_eq!(err.status_code(), 404);
        assert_eq!(err.to_string(), "Unknown operation 'subnets'");
    }

    #[test]
    fn test_custom_default_mode() {
        let handler = Handler::new(cloudflare_builtin().clone(), CloudMode::Oci);
        let info = handler
            .subnet_info(&SubnetInfoRequest {
                network: "10.0.0.0/24".to_string(),
                mode: None,
            })
            .unwrap();
        assert_eq!(info.mode, CloudMode::Oci);
        assert_eq!(info.usable_addresses, crate::models::AddressCount::Exact(253));
    }
}
