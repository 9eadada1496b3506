//! Group operations: creation, membership management and listings.

use sea_orm::{
    ActiveValue, JoinType, QueryFilter, QueryOrder, QuerySelect, TransactionTrait, prelude::*,
};

use crate::{EngineError, ResultEngine, groups, memberships, users};

use super::{Engine, normalize_required_text, require_positive_id, with_tx};

impl Engine {
    /// Create a group owned by `owner_id` and return its id.
    ///
    /// The owner membership row is written in the same transaction as the
    /// group row, so a group can never exist without its owner as a member.
    pub async fn new_group(&self, name: &str, owner_id: i32) -> ResultEngine<i32> {
        let name = normalize_required_text(name, "group name")?;

        with_tx!(self, |tx| {
            let group = groups::ActiveModel {
                name: ActiveValue::Set(name),
                owner_id: ActiveValue::Set(owner_id),
                ..Default::default()
            }
            .insert(&tx)
            .await?;

            memberships::ActiveModel {
                group_id: ActiveValue::Set(group.id),
                user_id: ActiveValue::Set(owner_id),
            }
            .insert(&tx)
            .await?;

            Ok(group.id)
        })
    }

    /// Add a user to a group. Only the group owner may do this.
    pub async fn add_group_member(
        &self,
        group_id: i32,
        member_id: i32,
        actor_id: i32,
    ) -> ResultEngine<()> {
        require_positive_id(group_id, "group_id")?;
        require_positive_id(member_id, "user_id")?;

        with_tx!(self, |tx| {
            self.require_group_owner(&tx, group_id, actor_id).await?;
            let member = self.require_user(&tx, member_id).await?;

            if self.member_exists(&tx, member_id, group_id).await? {
                return Err(EngineError::ExistingKey(member.username));
            }

            memberships::ActiveModel {
                group_id: ActiveValue::Set(group_id),
                user_id: ActiveValue::Set(member_id),
            }
            .insert(&tx)
            .await?;

            Ok(())
        })
    }

    /// List the groups the user belongs to, ordered by name.
    pub async fn groups_for_user(&self, user_id: i32) -> ResultEngine<Vec<groups::Model>> {
        with_tx!(self, |tx| {
            groups::Entity::find()
                .join(JoinType::InnerJoin, groups::Relation::Memberships.def())
                .filter(memberships::Column::UserId.eq(user_id))
                .order_by_asc(groups::Column::Name)
                .all(&tx)
                .await
                .map_err(Into::into)
        })
    }

    /// List a group's members as `(id, username)`, ordered by username.
    /// The actor must be a member itself.
    pub async fn group_members(
        &self,
        group_id: i32,
        actor_id: i32,
    ) -> ResultEngine<Vec<(i32, String)>> {
        with_tx!(self, |tx| {
            self.require_member(&tx, actor_id, group_id).await?;

            let rows = users::Entity::find()
                .join(JoinType::InnerJoin, users::Relation::Memberships.def())
                .filter(memberships::Column::GroupId.eq(group_id))
                .order_by_asc(users::Column::Username)
                .all(&tx)
                .await?;
            Ok(rows.into_iter().map(|u| (u.id, u.username)).collect())
        })
    }
}
