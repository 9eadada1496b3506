//! Expense API endpoints.

use api_types::Ack;
use api_types::expense::{
    ExpenseCreated, ExpenseList, ExpenseNew, ExpenseRemove, ExpenseUpdate, ExpenseView,
};
use axum::extract::State;
use chrono::NaiveDate;

use crate::{Json, ServerError, server::ServerState};

fn parse_date(raw: &str) -> Result<NaiveDate, ServerError> {
    raw.parse::<NaiveDate>()
        .map_err(|_| ServerError::Generic(format!("invalid date \"{raw}\", expected YYYY-MM-DD")))
}

pub async fn add(
    State(state): State<ServerState>,
    Json(payload): Json<ExpenseNew>,
) -> Result<Json<ExpenseCreated>, ServerError> {
    let user_id = state.tokens.verify(&payload.token)?;
    let date = parse_date(&payload.date)?;

    let expense_id = state
        .engine
        .add_expense(
            payload.group_id,
            &payload.description,
            payload.amount,
            &payload.category,
            date,
            user_id,
        )
        .await?;

    Ok(Json(ExpenseCreated {
        message: "Expense added successfully".to_string(),
        expense_id,
    }))
}

/// List expenses for one group, or across all the caller's groups when no
/// positive `group_id` is given.
pub async fn list(
    State(state): State<ServerState>,
    Json(payload): Json<ExpenseList>,
) -> Result<Json<Vec<ExpenseView>>, ServerError> {
    let user_id = state.tokens.verify(&payload.token)?;

    let group_id = payload.group_id.filter(|id| *id > 0);
    let expenses = state
        .engine
        .list_expenses(group_id, user_id)
        .await?
        .into_iter()
        .map(|expense| ExpenseView {
            id: expense.id,
            description: expense.description,
            amount: expense.amount,
            category: expense.category,
            date: expense.date,
            group_id: expense.group_id,
        })
        .collect();

    Ok(Json(expenses))
}

pub async fn update(
    State(state): State<ServerState>,
    Json(payload): Json<ExpenseUpdate>,
) -> Result<Json<Ack>, ServerError> {
    let user_id = state.tokens.verify(&payload.token)?;
    let date = parse_date(&payload.date)?;

    state
        .engine
        .update_expense(
            payload.group_id,
            payload.expense_id,
            &payload.description,
            payload.amount,
            &payload.category,
            date,
            user_id,
        )
        .await?;

    Ok(Json(Ack {
        message: "Expense updated successfully".to_string(),
    }))
}

pub async fn remove(
    State(state): State<ServerState>,
    Json(payload): Json<ExpenseRemove>,
) -> Result<Json<Ack>, ServerError> {
    let user_id = state.tokens.verify(&payload.token)?;

    state
        .engine
        .remove_expense(payload.group_id, payload.expense_id, user_id)
        .await?;

    Ok(Json(Ack {
        message: "Expense removed successfully".to_string(),
    }))
}
