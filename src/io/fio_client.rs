//! Fio banka statement feed client
//!
//! Fetches account movements for a date range from the Fio REST API:
//! `GET {base}/periods/{token}/{start}/{end}/transactions.json`.

use crate::core::BankFeed;
use crate::types::{RawTransaction, SyncError, DATE_FORMAT};
use chrono::NaiveDate;
use reqwest::blocking::Client;
use serde::Deserialize;
use std::time::Duration;
use tracing::debug;

/// Default base URL of the Fio REST API
pub const DEFAULT_FIO_URL: &str = "https://www.fio.cz/ib_api/rest";

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct StatementResponse {
    account_statement: AccountStatement,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct AccountStatement {
    transaction_list: TransactionList,
}

#[derive(Debug, Default, Deserialize)]
struct TransactionList {
    #[serde(default)]
    transaction: Vec<RawTransaction>,
}

/// HTTP client for the Fio statement API
pub struct FioClient {
    client: Client,
    base_url: String,
    token: String,
}

impl FioClient {
    /// Creates a new FioClient
    ///
    /// The token is part of the request path and never logged.
    pub fn new(base_url: &str, token: &str, timeout: Duration) -> Result<Self, SyncError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| SyncError::config(format!("Failed to build HTTP client: {}", e)))?;

        Ok(FioClient {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            token: token.to_string(),
        })
    }

    fn statement_url(&self, start: NaiveDate, end: NaiveDate) -> String {
        format!(
            "{}/periods/{}/{}/{}/transactions.json",
            self.base_url,
            self.token,
            start.format(DATE_FORMAT),
            end.format(DATE_FORMAT)
        )
    }
}

impl BankFeed for FioClient {
    fn fetch_transactions(
        &self,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<RawTransaction>, SyncError> {
        debug!(%start, %end, "Requesting bank statement");

        let response = self
            .client
            .get(self.statement_url(start, end))
            .header("Content-Type", "application/json")
            .send()
            .map_err(|e| SyncError::feed_fetch(e.without_url()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(SyncError::feed_fetch(format!("HTTP {}", status)));
        }

        let statement: StatementResponse = response
            .json()
            .map_err(|e| SyncError::feed_fetch(format!("Invalid statement: {}", e.without_url())))?;

        Ok(statement.account_statement.transaction_list.transaction)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::Server;

    fn date(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, d).unwrap()
    }

    const STATEMENT: &str = r#"{
        "accountStatement": {
            "info": {"accountId": "2400123456", "currency": "CZK"},
            "transactionList": {
                "transaction": [
                    {
                        "column22": {"value": 26962199069, "name": "ID pohybu", "id": 22},
                        "column0": {"value": "2024-01-02+0100", "name": "Datum", "id": 0},
                        "column1": {"value": 1500.0, "name": "Objem", "id": 1},
                        "column14": {"value": "CZK", "name": "Měna", "id": 14},
                        "column5": {"value": "2024001", "name": "VS", "id": 5},
                        "column7": null
                    },
                    {
                        "column22": {"value": 26962199070, "name": "ID pohybu", "id": 22},
                        "column0": {"value": "2024-01-03+0100", "name": "Datum", "id": 0},
                        "column1": {"value": -200.0, "name": "Objem", "id": 1},
                        "column14": {"value": "CZK", "name": "Měna", "id": 14},
                        "column5": null
                    }
                ]
            }
        }
    }"#;

    #[test]
    fn test_fetch_transactions() {
        let mut server = Server::new();
        let mock = server
            .mock(
                "GET",
                "/periods/secret-token/2024-01-01/2024-01-05/transactions.json",
            )
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(STATEMENT)
            .create();

        let client = FioClient::new(&server.url(), "secret-token", Duration::from_secs(5)).unwrap();
        let records = client.fetch_transactions(date(1), date(5)).unwrap();

        mock.assert();
        assert_eq!(records.len(), 2);
        assert_eq!(
            records[0].column("column22").and_then(|c| c.text()),
            Some("26962199069".to_string())
        );
        assert!(records[1].column("column5").is_none());
    }

    #[test]
    fn test_empty_transaction_list() {
        let mut server = Server::new();
        let _mock = server
            .mock("GET", mockito::Matcher::Any)
            .with_status(200)
            .with_body(r#"{"accountStatement": {"transactionList": {"transaction": []}}}"#)
            .create();

        let client = FioClient::new(&server.url(), "t", Duration::from_secs(5)).unwrap();
        assert!(client.fetch_transactions(date(1), date(5)).unwrap().is_empty());
    }

    #[test]
    fn test_http_error_is_feed_fetch_error() {
        let mut server = Server::new();
        let _mock = server
            .mock("GET", mockito::Matcher::Any)
            .with_status(409)
            .create();

        let client = FioClient::new(&server.url(), "t", Duration::from_secs(5)).unwrap();
        let error = client.fetch_transactions(date(1), date(5)).unwrap_err();

        assert_eq!(error, SyncError::feed_fetch("HTTP 409 Conflict"));
    }

    #[test]
    fn test_undecodable_body_is_feed_fetch_error() {
        let mut server = Server::new();
        let _mock = server
            .mock("GET", mockito::Matcher::Any)
            .with_status(200)
            .with_body("<html>maintenance</html>")
            .create();

        let client = FioClient::new(&server.url(), "t", Duration::from_secs(5)).unwrap();
        assert!(matches!(
            client.fetch_transactions(date(1), date(5)),
            Err(SyncError::FeedFetch { .. })
        ));
    }

    #[test]
    fn test_statement_url_trims_trailing_slash() {
        let client = FioClient::new(
            "https://www.fio.cz/ib_api/rest/",
            "abc",
            Duration::from_secs(5),
        )
        .unwrap();

        assert_eq!(
            client.statement_url(date(1), date(5)),
            "https://www.fio.cz/ib_api/rest/periods/abc/2024-01-01/2024-01-05/transactions.json"
        );
    }
}
