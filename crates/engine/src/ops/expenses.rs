//! Expense ledger operations.
//!
//! Every operation runs the same gate sequence before touching the table:
//! validate input, confirm the actor exists, confirm the actor is a member of
//! the group, then (for targeted operations) confirm the expense exists in
//! that group.

use chrono::NaiveDate;
use sea_orm::{
    ActiveValue, JoinType, QueryFilter, QueryOrder, QuerySelect, TransactionTrait, prelude::*,
};

use crate::{EngineError, ResultEngine, expenses, memberships};

use super::{Engine, normalize_required_text, require_positive_id, with_tx};

fn normalize_amount(amount: f64) -> ResultEngine<f64> {
    if !amount.is_finite() || amount <= 0.0 {
        return Err(EngineError::Validation(
            "amount must be greater than zero".to_string(),
        ));
    }
    Ok(amount)
}

impl Engine {
    /// Record a new expense and return its id.
    ///
    /// Repeated identical calls create distinct records; there is no
    /// duplicate detection.
    pub async fn add_expense(
        &self,
        group_id: i32,
        description: &str,
        amount: f64,
        category: &str,
        date: NaiveDate,
        actor_id: i32,
    ) -> ResultEngine<i32> {
        require_positive_id(group_id, "group_id")?;
        let description = normalize_required_text(description, "description")?;
        let category = normalize_required_text(category, "category")?;
        let amount = normalize_amount(amount)?;

        with_tx!(self, |tx| {
            self.require_user(&tx, actor_id).await?;
            self.require_member(&tx, actor_id, group_id).await?;

            let expense = expenses::ActiveModel {
                description: ActiveValue::Set(description),
                amount: ActiveValue::Set(amount),
                category: ActiveValue::Set(category),
                date: ActiveValue::Set(date),
                group_id: ActiveValue::Set(group_id),
                ..Default::default()
            }
            .insert(&tx)
            .await?;

            Ok(expense.id)
        })
    }

    /// Replace an expense's fields. The expense must belong to `group_id`;
    /// a mismatched pair is a not-found error, never a silent no-op.
    pub async fn update_expense(
        &self,
        group_id: i32,
        expense_id: i32,
        description: &str,
        amount: f64,
        category: &str,
        date: NaiveDate,
        actor_id: i32,
    ) -> ResultEngine<()> {
        require_positive_id(group_id, "group_id")?;
        require_positive_id(expense_id, "expense_id")?;
        let description = normalize_required_text(description, "description")?;
        let category = normalize_required_text(category, "category")?;
        let amount = normalize_amount(amount)?;

        with_tx!(self, |tx| {
            self.require_user(&tx, actor_id).await?;
            self.require_member(&tx, actor_id, group_id).await?;
            let expense = self.require_expense_in_group(&tx, group_id, expense_id).await?;

            let mut expense: expenses::ActiveModel = expense.into();
            expense.description = ActiveValue::Set(description);
            expense.amount = ActiveValue::Set(amount);
            expense.category = ActiveValue::Set(category);
            expense.date = ActiveValue::Set(date);
            expense.update(&tx).await?;

            Ok(())
        })
    }

    /// Delete an expense. Filtered by (expense id, group id) so membership in
    /// one group never allows deleting another group's records.
    pub async fn remove_expense(
        &self,
        group_id: i32,
        expense_id: i32,
        actor_id: i32,
    ) -> ResultEngine<()> {
        require_positive_id(group_id, "group_id")?;
        require_positive_id(expense_id, "expense_id")?;

        with_tx!(self, |tx| {
            self.require_user(&tx, actor_id).await?;
            self.require_member(&tx, actor_id, group_id).await?;
            self.require_expense_in_group(&tx, group_id, expense_id)
                .await?;

            expenses::Entity::delete_many()
                .filter(expenses::Column::Id.eq(expense_id))
                .filter(expenses::Column::GroupId.eq(group_id))
                .exec(&tx)
                .await?;

            Ok(())
        })
    }

    /// List expenses ordered by date descending.
    ///
    /// With a group id, the actor must be a member of that group and only its
    /// expenses are returned. Without one, the result is the union of
    /// expenses across every group the actor belongs to.
    pub async fn list_expenses(
        &self,
        group_id: Option<i32>,
        actor_id: i32,
    ) -> ResultEngine<Vec<expenses::Model>> {
        with_tx!(self, |tx| {
            match group_id {
                Some(group_id) => {
                    self.require_member(&tx, actor_id, group_id).await?;
                    expenses::Entity::find()
                        .filter(expenses::Column::GroupId.eq(group_id))
                        .order_by_desc(expenses::Column::Date)
                        .all(&tx)
                        .await
                        .map_err(Into::into)
                }
                None => expenses::Entity::find()
                    .join(JoinType::InnerJoin, expenses::Relation::Memberships.def())
                    .filter(memberships::Column::UserId.eq(actor_id))
                    .order_by_desc(expenses::Column::Date)
                    .all(&tx)
                    .await
                    .map_err(Into::into),
            }
        })
    }
}
