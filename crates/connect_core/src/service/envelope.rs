//! Response envelope for calling layers.
//!
//! Shapes:
//! - success: `{"status":"success","message":..,"result":{<name>:..}}`
//!   (`result` omitted when there is nothing to return)
//! - failure: `{"status":"failed","message":..,"result":{"error":..}}`,
//!   plus `"errors"` with field errors on validation failures.

use crate::model::entity::{Entity, EntityId};
use crate::service::entity_service::{ServiceError, ServiceResult};
use serde::Serialize;
use serde_json::{json, Value};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EnvelopeStatus {
    Success,
    Failed,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Envelope {
    pub status: EnvelopeStatus,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<Value>,
}

impl Envelope {
    pub fn success(message: impl Into<String>, result: Option<Value>) -> Self {
        Self {
            status: EnvelopeStatus::Success,
            message: message.into(),
            result,
        }
    }

    /// Failure envelope; internal details stay out of the payload.
    pub fn failure(message: impl Into<String>, err: &ServiceError) -> Self {
        let result = match err {
            ServiceError::Validation(errors) => json!({
                "error": err.to_string(),
                "errors": errors,
            }),
            _ => json!({ "error": err.to_string() }),
        };
        Self {
            status: EnvelopeStatus::Failed,
            message: message.into(),
            result: Some(result),
        }
    }

    pub fn created<E: Entity + Serialize>(outcome: &ServiceResult<E>) -> Self {
        match outcome {
            Ok(entity) => Self::success(
                format!("{} created!", E::LABEL),
                Some(json!({ (E::NAME): entity })),
            ),
            Err(err) => Self::failure(failure_message::<E>("create", err), err),
        }
    }

    pub fn found<E: Entity + Serialize>(outcome: &ServiceResult<Vec<E>>) -> Self {
        match outcome {
            Ok(entities) if entities.is_empty() => {
                Self::success(format!("No {} Found!", E::LABEL_PLURAL), None)
            }
            Ok(entities) => Self::success(
                format!("{} Found!", E::LABEL_PLURAL),
                Some(json!({ (E::PLURAL): entities })),
            ),
            Err(err) => Self::failure(format!("Unable to find {}", E::PLURAL), err),
        }
    }

    pub fn found_by_id<E: Entity + Serialize>(id: EntityId, outcome: &ServiceResult<E>) -> Self {
        match outcome {
            Ok(entity) => Self::success(
                format!("{} Found!", E::LABEL),
                Some(json!({ (E::NAME): entity })),
            ),
            Err(err @ ServiceError::NotFound { .. }) => {
                Self::failure(format!("No {} found for the id {id}", E::PLURAL), err)
            }
            Err(err) => Self::failure(format!("Unable to find {} by id", E::NAME), err),
        }
    }

    pub fn updated<E: Entity + Serialize>(outcome: &ServiceResult<E>) -> Self {
        match outcome {
            Ok(entity) => Self::success(
                format!("{} updated!", E::LABEL),
                Some(json!({ (E::NAME): entity })),
            ),
            Err(err) => Self::failure(failure_message::<E>("update", err), err),
        }
    }

    pub fn deleted<E: Entity>(outcome: &ServiceResult<()>) -> Self {
        match outcome {
            Ok(()) => Self::success(format!("{} Deleted!", E::LABEL), None),
            Err(err) => Self::failure(failure_message::<E>("delete", err), err),
        }
    }
}

fn failure_message<E: Entity>(verb: &str, err: &ServiceError) -> String {
    match err {
        ServiceError::Validation(_) => "Validation Failed".to_string(),
        _ => format!("Unable to {verb} {}", E::NAME),
    }
}

#[cfg(test)]
mod tests {
    use super::Envelope;
    use crate::model::entity::Status;
    use crate::model::user::User;
    use crate::service::entity_service::ServiceError;
    use crate::validate::FieldError;

    #[test]
    fn created_envelope_nests_entity_under_its_name() {
        let mut user = User::new("Ann", "ann1", "9876543210", "a@x.com", Status::Active);
        user.id = Some(1);

        let json = serde_json::to_value(Envelope::created(&Ok(user))).unwrap();
        assert_eq!(json["status"], "success");
        assert_eq!(json["message"], "User created!");
        assert_eq!(json["result"]["user"]["id"], 1);
        assert_eq!(json["result"]["user"]["mobile_number"], "9876543210");
    }

    #[test]
    fn empty_find_has_no_result() {
        let json = serde_json::to_value(Envelope::found::<User>(&Ok(Vec::new()))).unwrap();
        assert_eq!(json["message"], "No Users Found!");
        assert!(json.get("result").is_none());
    }

    #[test]
    fn validation_failure_lists_field_errors() {
        let err = ServiceError::Validation(vec![FieldError::new("email", "is required")]);
        let json = serde_json::to_value(Envelope::created::<User>(&Err(err))).unwrap();

        assert_eq!(json["status"], "failed");
        assert_eq!(json["message"], "Validation Failed");
        assert_eq!(json["result"]["errors"][0]["field"], "email");
        assert_eq!(json["result"]["errors"][0]["message"], "is required");
    }

    #[test]
    fn internal_failure_hides_detail() {
        let err = ServiceError::Internal("disk I/O error at /var/db".to_string());
        let json = serde_json::to_value(Envelope::deleted::<User>(&Err(err))).unwrap();

        assert_eq!(json["message"], "Unable to delete user");
        assert_eq!(json["result"]["error"], "internal error");
    }

    #[test]
    fn not_found_by_id_names_the_id() {
        let err = ServiceError::NotFound {
            entity: "user",
            id: 9,
        };
        let json = serde_json::to_value(Envelope::found_by_id::<User>(9, &Err(err))).unwrap();

        assert_eq!(json["message"], "No users found for the id 9");
        assert_eq!(json["result"]["error"], "no user available for the id 9");
    }
}
