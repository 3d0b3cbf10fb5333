#[cfg(test)]
mod tests {
    use super::super::error::CaseLawError;

    #[test]
    fn test_transport_error_message() {
        let error = CaseLawError::transport(
            "https://www.caselaw.nsw.gov.au/search/advanced?page=2",
            Some(503),
            "bad status code 503",
        )
        .at_page(2);

        let msg = error.to_string();
        assert!(msg.contains("search/advanced?page=2"));
        assert!(msg.contains("at page 2"));
        assert!(msg.contains("503"));

        // Server errors are worth retrying by hand
        assert!(error.is_retryable());
        let hint = error.hint();
        assert!(hint.is_some());
        assert!(hint.unwrap().contains("internet connection"));
    }

    #[test]
    fn test_decision_transport_error_has_no_page() {
        let error = CaseLawError::transport("https://www.caselaw.nsw.gov.au/decision/abc", Some(404), "bad status code 404");
        let msg = error.to_string();
        assert!(!msg.contains("at page"));
        assert!(!error.is_retryable());
    }

    #[test]
    fn test_rate_limit_hint() {
        let error = CaseLawError::transport("https://example.org", Some(429), "too many requests");
        assert!(error.is_retryable());
        assert!(error.hint().unwrap().contains("--pause"));
    }

    #[test]
    fn test_at_page_leaves_other_errors_alone() {
        let error = CaseLawError::InvalidCriteria("court index 999 is out of range".to_string()).at_page(3);
        assert!(matches!(error, CaseLawError::InvalidCriteria(_)));
    }

    #[test]
    fn test_unknown_template_era() {
        let error = CaseLawError::UnknownTemplateEra {
            source_uri: "/decision/abc".to_string(),
            html_len: 1234,
        };

        let msg = error.to_string();
        assert!(msg.contains("/decision/abc"));
        assert!(msg.contains("1234 bytes"));
        assert!(error.hint().unwrap().contains("--dump"));
        assert!(!error.is_retryable());
    }

    #[test]
    fn test_missing_field() {
        let error = CaseLawError::MissingField {
            source_uri: "/decision/abc".to_string(),
            field: "court",
        };
        assert_eq!(error.to_string(), "Decision /decision/abc has no court");
        assert!(error.hint().is_none());
    }

    #[test]
    fn test_invalid_criteria_hint() {
        let error = CaseLawError::InvalidCriteria("court index 999 is out of range (1-13)".to_string());
        assert!(error.to_string().starts_with("Invalid search criteria"));
        assert!(error.hint().unwrap().contains("nswcaselaw list courts"));
    }

    #[test]
    fn test_io_error_conversion() {
        let io_error = std::io::Error::new(std::io::ErrorKind::NotFound, "uris.csv");
        let error: CaseLawError = io_error.into();
        assert!(matches!(error, CaseLawError::Io(_)));
        assert!(error.to_string().contains("uris.csv"));
    }
}
