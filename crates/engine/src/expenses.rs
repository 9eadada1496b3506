//! Expenses table.
//!
//! Raw expense records scoped to a group. The engine never aggregates or
//! settles them; it only stores and lists.

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "expenses")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub description: String,
    #[sea_orm(column_type = "Double")]
    pub amount: f64,
    pub category: String,
    pub date: Date,
    pub group_id: i32,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::groups::Entity",
        from = "Column::GroupId",
        to = "super::groups::Column::Id",
        on_update = "NoAction",
        on_delete = "NoAction"
    )]
    Groups,
    // Join edge on group_id, used to list everything a user can see in one
    // query. Not a key relation: one expense row matches one membership row
    // per member.
    #[sea_orm(
        belongs_to = "super::memberships::Entity",
        from = "Column::GroupId",
        to = "super::memberships::Column::GroupId",
        on_update = "NoAction",
        on_delete = "NoAction"
    )]
    Memberships,
}

impl Related<super::groups::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Groups.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
