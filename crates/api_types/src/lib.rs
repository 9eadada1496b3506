use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Plain success acknowledgement, `{"message": "..."}`.
#[derive(Debug, Serialize, Deserialize)]
pub struct Ack {
    pub message: String,
}

pub mod user {
    use super::*;

    #[derive(Debug, Serialize, Deserialize)]
    pub struct Register {
        pub username: String,
        pub password: String,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct Login {
        pub username: String,
        pub password: String,
    }

    /// Returned by both `/register` and `/login`.
    #[derive(Debug, Serialize, Deserialize)]
    pub struct AuthResponse {
        pub message: String,
        pub user_id: i32,
        pub token: String,
    }

    /// Request body for `/users/get`.
    #[derive(Debug, Serialize, Deserialize)]
    pub struct UsersGet {
        pub token: String,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct UserView {
        pub id: i32,
        pub username: String,
    }
}

pub mod token {
    use super::*;

    #[derive(Debug, Serialize, Deserialize)]
    pub struct TokenValidate {
        pub token: String,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct TokenStatus {
        pub message: String,
        pub user_id: i32,
        pub valid: bool,
    }
}

pub mod group {
    use super::*;

    #[derive(Debug, Serialize, Deserialize)]
    pub struct GroupNew {
        pub token: String,
        pub name: String,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct GroupCreated {
        pub message: String,
        pub group_id: i32,
    }

    /// Request body for `/groups/get`.
    #[derive(Debug, Serialize, Deserialize)]
    pub struct GroupsGet {
        pub token: String,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct GroupView {
        pub id: i32,
        pub name: String,
        pub owner_id: i32,
    }
}

pub mod membership {
    use super::*;

    /// Request body for adding a member (owner-only).
    #[derive(Debug, Serialize, Deserialize)]
    pub struct MemberAdd {
        pub token: String,
        pub group_id: i32,
        pub user_id: i32,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct MembersGet {
        pub token: String,
        pub group_id: i32,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct MemberView {
        pub id: i32,
        pub username: String,
    }

    /// Response body for listing members.
    #[derive(Debug, Serialize, Deserialize)]
    pub struct MembersResponse {
        pub users: Vec<MemberView>,
    }
}

pub mod expense {
    use super::*;

    /// Request body for recording a new expense.
    ///
    /// `date` travels as `YYYY-MM-DD`; anything else is rejected with a 400.
    #[derive(Debug, Serialize, Deserialize)]
    pub struct ExpenseNew {
        pub token: String,
        pub group_id: i32,
        pub description: String,
        pub amount: f64,
        pub category: String,
        pub date: String,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct ExpenseCreated {
        pub message: String,
        pub expense_id: i32,
    }

    /// Request body for `/expenses/get`.
    ///
    /// A missing or non-positive `group_id` selects the union of expenses
    /// across every group the caller belongs to.
    #[derive(Debug, Serialize, Deserialize)]
    pub struct ExpenseList {
        pub token: String,
        pub group_id: Option<i32>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct ExpenseUpdate {
        pub token: String,
        pub group_id: i32,
        pub expense_id: i32,
        pub description: String,
        pub amount: f64,
        pub category: String,
        pub date: String,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct ExpenseRemove {
        pub token: String,
        pub group_id: i32,
        pub expense_id: i32,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct ExpenseView {
        pub id: i32,
        pub description: String,
        pub amount: f64,
        pub category: String,
        pub date: NaiveDate,
        pub group_id: i32,
    }
}
