use chrono::{DateTime as ChronoDateTime, Utc};
use mongodb::bson::{oid::ObjectId, DateTime};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Alumni {
    #[serde(rename = "_id")]
    pub id: ObjectId,
    pub name: String,
    pub batch: String,
    pub current_company: String,
    pub current_position: String,
    #[serde(default)]
    pub previous_companies: Vec<String>,
    pub profile_image: String,
    pub description: String,
    pub quote: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub linkedin: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub facebook: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub instagram: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default)]
    pub is_deleted: bool,
    pub created_at: DateTime,
    pub updated_at: DateTime,
}

#[derive(Debug, Clone, Serialize)]
pub struct AlumniResponse {
    pub id: String,
    pub name: String,
    pub batch: String,
    pub current_company: String,
    pub current_position: String,
    pub previous_companies: Vec<String>,
    pub profile_image: String,
    pub description: String,
    pub quote: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub linkedin: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub facebook: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub instagram: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    pub created_at: ChronoDateTime<Utc>,
}

impl From<Alumni> for AlumniResponse {
    fn from(a: Alumni) -> Self {
        AlumniResponse {
            id: a.id.to_hex(),
            name: a.name,
            batch: a.batch,
            current_company: a.current_company,
            current_position: a.current_position,
            previous_companies: a.previous_companies,
            profile_image: a.profile_image,
            description: a.description,
            quote: a.quote,
            linkedin: a.linkedin,
            facebook: a.facebook,
            instagram: a.instagram,
            email: a.email,
            created_at: a.created_at.to_chrono(),
        }
    }
}
