use kasa::core::currency::Currency;
use kasa::core::recurring::RecurringIncome;
use kasa::core::transaction::{DateFilter, Transaction, TransactionDraft, TransactionKind};
use kasa::store::{Collection, Store};
use std::fs;
use std::path::Path;

mod test_utils {
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    pub async fn mock_endpoint(url_path: &str, body: &str) -> MockServer {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path(url_path))
            .respond_with(ResponseTemplate::new(200).set_body_string(body))
            .mount(&mock_server)
            .await;

        mock_server
    }

    pub async fn dead_server() -> MockServer {
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&mock_server)
            .await;
        mock_server
    }
}

/// Writes a config whose providers all point at `provider_uri` and whose
/// data lives in `data_dir`.
fn write_config(config_path: &Path, data_dir: &Path, provider_uri: &str) {
    let config_content = format!(
        r#"
currency: "TRY"
providers:
  frankfurter:
    base_url: {provider_uri}
  er_api:
    base_url: {provider_uri}
  goldprice:
    base_url: {provider_uri}
  coingecko:
    base_url: {provider_uri}
  coincap:
    base_url: {provider_uri}
data_path: "{}"
"#,
        data_dir.display()
    );
    fs::write(config_path, config_content).expect("Failed to write config file");
}

fn expense_draft(description: &str, amount: &str) -> TransactionDraft {
    TransactionDraft {
        description: Some(description.to_string()),
        amount: amount.to_string(),
        category: "Food".to_string(),
        currency: Currency::Try,
        kind: TransactionKind::Expense,
        purchase_rate: None,
    }
}

#[test_log::test(tokio::test)]
async fn test_add_list_delete_flow() {
    let dead = test_utils::dead_server().await;
    let data_dir = tempfile::tempdir().unwrap();
    let config_file = tempfile::NamedTempFile::new().unwrap();
    write_config(config_file.path(), data_dir.path(), &dead.uri());
    let config_path = config_file.path().to_str().unwrap();

    let result = kasa::run_command(
        kasa::AppCommand::Add(expense_draft("Lunch", "120,50")),
        Some(config_path),
    )
    .await;
    assert!(result.is_ok(), "Add failed: {:?}", result.err());

    // Inspect the store directly.
    let id = {
        let store = Store::open(data_dir.path()).unwrap();
        let transactions = store.collection::<Transaction>("transactions").unwrap();
        let txs = transactions.list().await.unwrap();
        assert_eq!(txs.len(), 1);
        assert_eq!(txs[0].description, "Lunch");
        assert_eq!(txs[0].amount, -120.5); // stored negative, comma parsed
        txs[0].id.clone()
    };

    let result = kasa::run_command(
        kasa::AppCommand::List {
            period: DateFilter::ThisMonth,
            category: Some("Food".to_string()),
        },
        Some(config_path),
    )
    .await;
    assert!(result.is_ok(), "List failed: {:?}", result.err());

    let result = kasa::run_command(kasa::AppCommand::Delete { id }, Some(config_path)).await;
    assert!(result.is_ok(), "Delete failed: {:?}", result.err());

    let store = Store::open(data_dir.path()).unwrap();
    let transactions = store.collection::<Transaction>("transactions").unwrap();
    assert!(transactions.list().await.unwrap().is_empty());
}

#[test_log::test(tokio::test)]
async fn test_delete_unknown_id_fails() {
    let dead = test_utils::dead_server().await;
    let data_dir = tempfile::tempdir().unwrap();
    let config_file = tempfile::NamedTempFile::new().unwrap();
    write_config(config_file.path(), data_dir.path(), &dead.uri());

    let result = kasa::run_command(
        kasa::AppCommand::Delete {
            id: "no-such-id".to_string(),
        },
        Some(config_file.path().to_str().unwrap()),
    )
    .await;
    assert!(result.is_err());
}

#[test_log::test(tokio::test)]
async fn test_invalid_drafts_are_rejected() {
    let dead = test_utils::dead_server().await;
    let data_dir = tempfile::tempdir().unwrap();
    let config_file = tempfile::NamedTempFile::new().unwrap();
    write_config(config_file.path(), data_dir.path(), &dead.uri());
    let config_path = config_file.path().to_str().unwrap();

    // Unparseable amount.
    let result = kasa::run_command(
        kasa::AppCommand::Add(expense_draft("Lunch", "abc")),
        Some(config_path),
    )
    .await;
    assert!(result.is_err());

    // Expense without a description.
    let mut draft = expense_draft("", "100");
    draft.description = None;
    let result = kasa::run_command(kasa::AppCommand::Add(draft), Some(config_path)).await;
    assert!(result.is_err());

    let store = Store::open(data_dir.path()).unwrap();
    let transactions = store.collection::<Transaction>("transactions").unwrap();
    assert!(transactions.list().await.unwrap().is_empty());
}

#[test_log::test(tokio::test)]
async fn test_recurring_income_materializes_on_open() {
    let dead = test_utils::dead_server().await;
    let data_dir = tempfile::tempdir().unwrap();
    let config_file = tempfile::NamedTempFile::new().unwrap();
    write_config(config_file.path(), data_dir.path(), &dead.uri());
    let config_path = config_file.path().to_str().unwrap();

    // Day 1 is always due by the time any command runs.
    let result = kasa::run_command(
        kasa::AppCommand::RecurringAdd {
            amount: 5000.0,
            category: "Salary".to_string(),
            currency: Currency::Try,
            day: 1,
        },
        Some(config_path),
    )
    .await;
    assert!(result.is_ok(), "RecurringAdd failed: {:?}", result.err());

    // The next app open materializes the income.
    let result = kasa::run_command(kasa::AppCommand::RecurringList, Some(config_path)).await;
    assert!(result.is_ok(), "RecurringList failed: {:?}", result.err());

    {
        let store = Store::open(data_dir.path()).unwrap();
        let transactions = store.collection::<Transaction>("transactions").unwrap();
        let txs = transactions.list().await.unwrap();
        assert_eq!(txs.len(), 1);
        assert_eq!(txs[0].description, "Recurring: Salary");
        assert_eq!(txs[0].kind, TransactionKind::Income);

        let recurring = store
            .collection::<RecurringIncome>("recurring_incomes")
            .unwrap();
        let templates = recurring.list().await.unwrap();
        assert!(templates[0].last_added.is_some());
    }

    // Further opens within the same month add nothing.
    let result = kasa::run_command(kasa::AppCommand::RecurringList, Some(config_path)).await;
    assert!(result.is_ok());

    let store = Store::open(data_dir.path()).unwrap();
    let transactions = store.collection::<Transaction>("transactions").unwrap();
    assert_eq!(transactions.list().await.unwrap().len(), 1);
}

#[test_log::test(tokio::test)]
async fn test_summary_with_mocked_rates() {
    let frankfurter = test_utils::mock_endpoint(
        "/latest",
        r#"{"amount": 1.0, "base": "USD", "rates": {"TRY": 32.5, "EUR": 0.92, "RUB": 91.0}}"#,
    )
    .await;
    let data_dir = tempfile::tempdir().unwrap();
    let config_file = tempfile::NamedTempFile::new().unwrap();
    // Everything behind the frankfurter mock; the other families fail and
    // degrade gracefully.
    write_config(config_file.path(), data_dir.path(), &frankfurter.uri());
    let config_path = config_file.path().to_str().unwrap();

    let draft = TransactionDraft {
        description: None,
        amount: "100".to_string(),
        category: "Salary".to_string(),
        currency: Currency::Usd,
        kind: TransactionKind::Income,
        purchase_rate: None,
    };
    let result = kasa::run_command(kasa::AppCommand::Add(draft), Some(config_path)).await;
    assert!(result.is_ok(), "Add failed: {:?}", result.err());

    let result = kasa::run_command(
        kasa::AppCommand::Summary {
            currency: Some(Currency::Eur),
        },
        Some(config_path),
    )
    .await;
    assert!(result.is_ok(), "Summary failed: {:?}", result.err());

    let result = kasa::run_command(
        kasa::AppCommand::Breakdown {
            kind: TransactionKind::Income,
            currency: None,
        },
        Some(config_path),
    )
    .await;
    assert!(result.is_ok(), "Breakdown failed: {:?}", result.err());
}
