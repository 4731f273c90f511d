//! Row lookups and counter adjustments shared by the services.
//!
//! Every counter change is a single `UPDATE ... SET c = c + delta` so that
//! concurrent writers cannot lose increments. Callers run these helpers on
//! the same transaction as the insert or delete being counted.

use model::entities::{bank, bank_office};
use sea_orm::sea_query::{Expr, Query, SimpleExpr};
use sea_orm::{ColumnTrait, ConnectionTrait, EntityTrait, PrimaryKeyTrait, QueryFilter};
use tracing::debug;

use crate::error::{Result, ServiceError};

/// Fetches a row by id, turning a miss into [`ServiceError::NotFound`].
pub(crate) async fn fetch<E, C>(conn: &C, entity: &'static str, id: i32) -> Result<E::Model>
where
    E: EntityTrait,
    i32: Into<<E::PrimaryKey as PrimaryKeyTrait>::ValueType>,
    C: ConnectionTrait,
{
    E::find_by_id(id)
        .one(conn)
        .await?
        .ok_or_else(|| ServiceError::not_found(entity, id))
}

pub(crate) async fn find_bank_by_name<C: ConnectionTrait>(conn: &C, name: &str) -> Result<bank::Model> {
    bank::Entity::find()
        .filter(bank::Column::Name.eq(name))
        .one(conn)
        .await?
        .ok_or_else(|| ServiceError::UnknownBank(name.to_string()))
}

/// Adds `delta` to one of the bank's counters.
pub(crate) async fn adjust_bank_counter<C: ConnectionTrait>(
    conn: &C,
    bank_id: i32,
    counter: bank::Column,
    delta: i32,
) -> Result<()> {
    let result = bank::Entity::update_many()
        .col_expr(counter, Expr::col(counter).add(delta))
        .filter(bank::Column::Id.eq(bank_id))
        .exec(conn)
        .await?;

    if result.rows_affected == 0 {
        return Err(ServiceError::not_found("Bank", bank_id));
    }
    debug!(bank_id, ?counter, delta, "Adjusted bank counter");
    Ok(())
}

/// Adds `delta` to the office's ATM counter.
pub(crate) async fn adjust_office_atms<C: ConnectionTrait>(conn: &C, office_id: i32, delta: i32) -> Result<()> {
    let result = bank_office::Entity::update_many()
        .col_expr(
            bank_office::Column::NumAtms,
            Expr::col(bank_office::Column::NumAtms).add(delta),
        )
        .filter(bank_office::Column::Id.eq(office_id))
        .exec(conn)
        .await?;

    if result.rows_affected == 0 {
        return Err(ServiceError::not_found("BankOffice", office_id));
    }
    debug!(office_id, delta, "Adjusted office ATM counter");
    Ok(())
}

/// Takes every ATM of an office off its bank's `num_atms`.
///
/// The office's count is read by the UPDATE itself, so ATMs installed after
/// the caller looked at the office are still released.
pub(crate) async fn release_office_atms<C: ConnectionTrait>(
    conn: &C,
    bank_id: i32,
    office_id: i32,
) -> Result<()> {
    let office_atms = Query::select()
        .column(bank_office::Column::NumAtms)
        .from(bank_office::Entity)
        .and_where(bank_office::Column::Id.eq(office_id))
        .to_owned();

    let result = bank::Entity::update_many()
        .col_expr(
            bank::Column::NumAtms,
            Expr::col(bank::Column::NumAtms).sub(SimpleExpr::SubQuery(
                None,
                Box::new(office_atms.into_sub_query_statement()),
            )),
        )
        .filter(bank::Column::Id.eq(bank_id))
        .exec(conn)
        .await?;

    if result.rows_affected == 0 {
        return Err(ServiceError::not_found("Bank", bank_id));
    }
    debug!(bank_id, office_id, "Released office ATMs from bank counter");
    Ok(())
}
