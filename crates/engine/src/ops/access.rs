//! Membership authority: the read predicates gating every other operation.
//!
//! All mutating and listing operations consult these before touching the
//! store and fail closed. Membership is checked before the existence of the
//! target record, so a non-member cannot tell from the error type whether a
//! record exists.

use sea_orm::{DatabaseTransaction, QueryFilter, TransactionTrait, prelude::*};

use crate::{EngineError, ResultEngine, expenses, groups, memberships, users};

use super::{Engine, with_tx};

impl Engine {
    pub(super) async fn find_user(
        &self,
        db: &DatabaseTransaction,
        user_id: i32,
    ) -> ResultEngine<Option<users::Model>> {
        users::Entity::find_by_id(user_id)
            .one(db)
            .await
            .map_err(Into::into)
    }

    pub(super) async fn require_user(
        &self,
        db: &DatabaseTransaction,
        user_id: i32,
    ) -> ResultEngine<users::Model> {
        self.find_user(db, user_id)
            .await?
            .ok_or_else(|| EngineError::KeyNotFound("user".to_string()))
    }

    pub(super) async fn member_exists(
        &self,
        db: &DatabaseTransaction,
        user_id: i32,
        group_id: i32,
    ) -> ResultEngine<bool> {
        memberships::Entity::find_by_id((group_id, user_id))
            .one(db)
            .await
            .map(|row| row.is_some())
            .map_err(Into::into)
    }

    pub(super) async fn require_member(
        &self,
        db: &DatabaseTransaction,
        user_id: i32,
        group_id: i32,
    ) -> ResultEngine<()> {
        if !self.member_exists(db, user_id, group_id).await? {
            return Err(EngineError::Forbidden(
                "user is not part of the group".to_string(),
            ));
        }
        Ok(())
    }

    /// Owner check is strict equality on the stored owner, not membership.
    pub(super) async fn require_group_owner(
        &self,
        db: &DatabaseTransaction,
        group_id: i32,
        user_id: i32,
    ) -> ResultEngine<groups::Model> {
        let group = groups::Entity::find_by_id(group_id)
            .one(db)
            .await?
            .ok_or_else(|| EngineError::KeyNotFound("group".to_string()))?;
        if group.owner_id != user_id {
            return Err(EngineError::Forbidden(
                "only the group owner can add members".to_string(),
            ));
        }
        Ok(group)
    }

    pub(super) async fn require_expense_in_group(
        &self,
        db: &DatabaseTransaction,
        group_id: i32,
        expense_id: i32,
    ) -> ResultEngine<expenses::Model> {
        expenses::Entity::find_by_id(expense_id)
            .filter(expenses::Column::GroupId.eq(group_id))
            .one(db)
            .await?
            .ok_or_else(|| EngineError::KeyNotFound("expense".to_string()))
    }

    /// Whether a user with this id exists.
    ///
    /// Token verification does not confirm the subject still exists; callers
    /// that need the distinction ask here.
    pub async fn user_exists(&self, user_id: i32) -> ResultEngine<bool> {
        with_tx!(self, |tx| self
            .find_user(&tx, user_id)
            .await
            .map(|user| user.is_some()))
    }

    /// Whether the user belongs to the group. Missing users or groups simply
    /// answer `false`.
    pub async fn is_member(&self, user_id: i32, group_id: i32) -> ResultEngine<bool> {
        with_tx!(self, |tx| self.member_exists(&tx, user_id, group_id).await)
    }

    /// Whether the user is the group's owner. A missing group answers `false`.
    pub async fn is_owner(&self, user_id: i32, group_id: i32) -> ResultEngine<bool> {
        with_tx!(self, |tx| {
            groups::Entity::find_by_id(group_id)
                .one(&tx)
                .await
                .map(|group| group.is_some_and(|g| g.owner_id == user_id))
                .map_err(Into::into)
        })
    }
}
