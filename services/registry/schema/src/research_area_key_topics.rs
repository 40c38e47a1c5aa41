use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "research_area_key_topics")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub research_area_id: i64,
    pub key_topic_title: String,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::research_areas::Entity",
        from = "Column::ResearchAreaId",
        to = "super::research_areas::Column::Id",
        on_delete = "Cascade"
    )]
    ResearchArea,
}

impl Related<super::research_areas::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::ResearchArea.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
