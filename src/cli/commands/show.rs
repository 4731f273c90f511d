use anyhow::Result;
use clap::ValueEnum;
use serde::Serialize;
use serde_json::Value;
use service::Services;
use tracing::debug;

use super::initdb::connect;

/// Tables that `list` can print.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum EntityKind {
    Banks,
    Offices,
    Atms,
    Employees,
    Users,
    PaymentAccounts,
    CreditAccounts,
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

pub async fn show_bank(database_url: &str, id: i32) -> Result<()> {
    let services = Services::new(connect(database_url).await?);
    let info = services.banks.get_all_info_about_bank(id).await?;
    print_json(&info)
}

pub async fn show_user(database_url: &str, id: i32) -> Result<()> {
    let services = Services::new(connect(database_url).await?);
    let info = services.users.get_all_info_about_user(id).await?;
    print_json(&info)
}

/// Every row of one table, as a JSON array.
pub async fn collect_rows(services: &Services, entity: EntityKind) -> Result<Value> {
    let rows = match entity {
        EntityKind::Banks => serde_json::to_value(services.banks.list().await?)?,
        EntityKind::Offices => serde_json::to_value(services.offices.list().await?)?,
        EntityKind::Atms => serde_json::to_value(services.atms.list().await?)?,
        EntityKind::Employees => serde_json::to_value(services.employees.list().await?)?,
        EntityKind::Users => serde_json::to_value(services.users.list().await?)?,
        EntityKind::PaymentAccounts => serde_json::to_value(services.payment_accounts.list().await?)?,
        EntityKind::CreditAccounts => serde_json::to_value(services.credit_accounts.list().await?)?,
    };
    debug!(?entity, "Collected rows");
    Ok(rows)
}

pub async fn list_entities(database_url: &str, entity: EntityKind) -> Result<()> {
    let services = Services::new(connect(database_url).await?);
    print_json(&collect_rows(&services, entity).await?)
}
