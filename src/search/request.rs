use chrono::NaiveDate;
use url::Url;

use super::SearchCriteria;
use crate::api::SEARCH_PATH;
use crate::courts::{CourtKind, CourtTable};
use crate::error::{CaseLawError, Result};

/// Date layout the search form expects
const FORM_DATE_FORMAT: &str = "%d/%m/%Y";

/// Query parameters for one results page, inspectable without fetching
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestSpec {
    pub endpoint: Url,
    /// Zero-based result page offset
    pub page: u32,
    /// Form parameters in submission order
    pub params: Vec<(String, String)>,
}

impl RequestSpec {
    /// Full URL with the encoded query string
    pub fn url(&self) -> Url {
        let mut url = self.endpoint.clone();
        url.query_pairs_mut()
            .clear()
            .extend_pairs(self.params.iter().map(|(k, v)| (k.as_str(), v.as_str())));
        url
    }

    /// All values submitted under `name`
    pub fn values(&self, name: &str) -> Vec<&str> {
        self.params
            .iter()
            .filter(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
            .collect()
    }
}

/// Translates search criteria into advanced search form submissions
#[derive(Debug, Clone)]
pub struct QueryBuilder<'a> {
    courts: &'a CourtTable,
    endpoint: Url,
}

impl<'a> QueryBuilder<'a> {
    pub fn new(courts: &'a CourtTable, base_url: &Url) -> Result<Self> {
        let endpoint = base_url
            .join(SEARCH_PATH)
            .map_err(|e| CaseLawError::Config(format!("Invalid base URL {}: {}", base_url, e)))?;
        Ok(Self { courts, endpoint })
    }

    pub fn courts(&self) -> &CourtTable {
        self.courts
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    /// Map criteria and a zero-based page offset to form parameters.
    ///
    /// Text fields are always submitted, empty when unset, in the order the
    /// form declares them. Every court checkbox contributes its hidden
    /// `_courts=on` companion whether or not it is selected.
    pub fn build_request(&self, criteria: &SearchCriteria, page: u32) -> Result<RequestSpec> {
        criteria.validate(self.courts)?;

        let text = |value: &Option<String>| value.as_deref().unwrap_or("").trim().to_string();
        let date = |value: Option<NaiveDate>| {
            value
                .map(|d| d.format(FORM_DATE_FORMAT).to_string())
                .unwrap_or_default()
        };

        let mut params: Vec<(String, String)> = [
            ("body", text(&criteria.body)),
            ("title", text(&criteria.title)),
            ("before", text(&criteria.before)),
            ("catchwords", text(&criteria.catchwords)),
            ("party", text(&criteria.party)),
            ("mnc", text(&criteria.citation)),
            ("startDate", date(criteria.start_date)),
            ("endDate", date(criteria.end_date)),
            ("fileNumber", text(&criteria.file_number)),
            ("legislationCited", text(&criteria.legislation_cited)),
            ("casesCited", text(&criteria.cases_cited)),
        ]
        .into_iter()
        .map(|(k, v)| (k.to_string(), v))
        .collect();

        self.push_checkboxes(&mut params, CourtKind::Courts, &criteria.courts);
        self.push_checkboxes(&mut params, CourtKind::Tribunals, &criteria.tribunals);
        params.push(("page".to_string(), page.to_string()));

        Ok(RequestSpec {
            endpoint: self.endpoint.clone(),
            page,
            params,
        })
    }

    fn push_checkboxes(&self, params: &mut Vec<(String, String)>, kind: CourtKind, selected: &[usize]) {
        let field = kind.form_field();
        for (position, entry) in self.courts.entries(kind).iter().enumerate() {
            if selected.contains(&(position + 1)) {
                params.push((field.to_string(), entry.id.clone()));
            }
            params.push((format!("_{}", field), "on".to_string()));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::CASELAW_BASE_URL;
    use pretty_assertions::assert_eq;

    fn base() -> Url {
        Url::parse(CASELAW_BASE_URL).unwrap()
    }

    #[test]
    fn test_text_fields_in_form_order() {
        let table = CourtTable::builtin();
        let builder = QueryBuilder::new(&table, &base()).unwrap();
        let criteria = SearchCriteria {
            catchwords: Some("defamation".to_string()),
            courts: vec![13],
            ..Default::default()
        };
        let spec = builder.build_request(&criteria, 0).unwrap();
        let names: Vec<&str> = spec.params.iter().take(11).map(|(k, _)| k.as_str()).collect();
        assert_eq!(
            names,
            vec![
                "body",
                "title",
                "before",
                "catchwords",
                "party",
                "mnc",
                "startDate",
                "endDate",
                "fileNumber",
                "legislationCited",
                "casesCited"
            ]
        );
        assert_eq!(spec.values("catchwords"), vec!["defamation"]);
        assert_eq!(spec.values("body"), vec![""]);
    }

    #[test]
    fn test_court_checkboxes() {
        let table = CourtTable::builtin();
        let builder = QueryBuilder::new(&table, &base()).unwrap();
        let criteria = SearchCriteria {
            courts: vec![3, 13],
            tribunals: vec![9],
            ..Default::default()
        };
        let spec = builder.build_request(&criteria, 0).unwrap();
        assert_eq!(
            spec.values("courts"),
            vec!["54a634063004de94513d8278", "54a634063004de94513d8281"]
        );
        assert_eq!(spec.values("_courts").len(), table.courts.len());
        assert_eq!(spec.values("tribunals"), vec!["54a634063004de94513d8283"]);
        assert_eq!(spec.values("_tribunals").len(), table.tribunals.len());
    }

    #[test]
    fn test_dates_and_page() {
        let table = CourtTable::builtin();
        let builder = QueryBuilder::new(&table, &base()).unwrap();
        let criteria = SearchCriteria {
            start_date: NaiveDate::from_ymd_opt(2020, 3, 1),
            end_date: NaiveDate::from_ymd_opt(2020, 12, 31),
            courts: vec![13],
            ..Default::default()
        };
        let spec = builder.build_request(&criteria, 4).unwrap();
        assert_eq!(spec.values("startDate"), vec!["01/03/2020"]);
        assert_eq!(spec.values("endDate"), vec!["31/12/2020"]);
        assert_eq!(spec.values("page"), vec!["4"]);
        assert_eq!(spec.page, 4);
    }

    #[test]
    fn test_url_is_search_endpoint() {
        let table = CourtTable::builtin();
        let builder = QueryBuilder::new(&table, &base()).unwrap();
        let criteria = SearchCriteria {
            title: Some("Smith v Jones".to_string()),
            courts: vec![13],
            ..Default::default()
        };
        let url = builder.build_request(&criteria, 1).unwrap().url();
        assert_eq!(url.path(), "/search/advanced");
        assert!(url.as_str().starts_with("https://www.caselaw.nsw.gov.au/search/advanced?body=&title=Smith+v+Jones"));
        assert!(url.as_str().ends_with("&page=1"));
    }

    #[test]
    fn test_invalid_criteria_rejected() {
        let table = CourtTable::builtin();
        let builder = QueryBuilder::new(&table, &base()).unwrap();
        let criteria = SearchCriteria {
            courts: vec![999],
            ..Default::default()
        };
        assert!(matches!(
            builder.build_request(&criteria, 0),
            Err(CaseLawError::InvalidCriteria(_))
        ));
    }
}
