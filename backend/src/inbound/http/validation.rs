//! Path parameter parsing shared by the HTTP handlers.

use serde_json::json;

use crate::domain::{DocumentId, Error, UserId};

fn invalid_id(field: &'static str, value: &str, message: impl std::fmt::Display) -> Error {
    Error::invalid_request(message.to_string()).with_details(json!({
        "field": field,
        "value": value,
        "code": "invalid_id",
    }))
}

/// Parse an article, page, or media id taken from the request path.
pub(crate) fn parse_document_id(raw: &str) -> Result<DocumentId, Error> {
    DocumentId::new(raw).map_err(|error| invalid_id("id", raw, error))
}

/// Parse a user id taken from the request path.
pub(crate) fn parse_user_id(raw: &str) -> Result<UserId, Error> {
    UserId::new(raw).map_err(|error| invalid_id("id", raw, error))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ErrorCode;
    use rstest::rstest;

    #[rstest]
    #[case("a1b2c3")]
    #[case("3f0c9d1e")]
    fn well_formed_ids_parse(#[case] raw: &str) {
        assert_eq!(
            parse_document_id(raw).expect("valid id").as_ref(),
            raw
        );
    }

    #[rstest]
    #[case("")]
    #[case("has space")]
    fn malformed_ids_name_the_field(#[case] raw: &str) {
        let error = parse_document_id(raw).expect_err("invalid id");
        assert_eq!(error.code(), ErrorCode::InvalidRequest);
        let details = error.details().expect("details");
        assert_eq!(details["field"], "id");
        assert_eq!(details["code"], "invalid_id");
    }

    #[rstest]
    fn user_ids_reject_whitespace() {
        assert!(parse_user_id("uid 1").is_err());
        assert!(parse_user_id("uid-1").is_ok());
    }
}
