use actix_web::{web, HttpResponse};
use mongodb::bson::{oid::ObjectId, DateTime};
use mongodb::Database;
use serde::Deserialize;
use std::collections::HashMap;
use validator::Validate;

use crate::db::{society_repo, user_repo, work_repo};
use crate::error::{AppError, Result};
use crate::middleware::AuthUser;
use crate::models::{
    User, UserPermission, UserRole, WorkAssignment, WorkAssignmentResponse, WorkStatus,
    WorkVisibility,
};
use crate::services::email::EmailService;
use crate::services::hierarchy;

#[derive(Debug, Deserialize, Validate)]
pub struct CreateAssignmentRequest {
    #[validate(length(min = 1))]
    pub title: String,

    #[validate(length(min = 1))]
    pub description: String,

    pub society: String,
    pub assigned_to: String,

    /// RFC 3339 or YYYY-MM-DD
    pub deadline: String,

    pub visibility: Option<WorkVisibility>,
}

async fn join_names(
    db: &Database,
    assignments: Vec<WorkAssignment>,
) -> Result<Vec<WorkAssignmentResponse>> {
    let mut user_ids: Vec<ObjectId> = Vec::new();
    let mut society_ids: Vec<ObjectId> = Vec::new();
    for a in &assignments {
        user_ids.push(a.assigned_to);
        user_ids.push(a.assigned_by);
        society_ids.push(a.society);
    }
    user_ids.sort();
    user_ids.dedup();
    society_ids.sort();
    society_ids.dedup();

    let users: HashMap<ObjectId, User> = user_repo::find_many_by_ids(db, &user_ids)
        .await?
        .into_iter()
        .map(|u| (u.id, u))
        .collect();

    let mut society_names: HashMap<ObjectId, String> = HashMap::new();
    for society_id in society_ids {
        if let Some(society) = society_repo::find(db, society_id).await? {
            society_names.insert(society.id, society.name);
        }
    }

    Ok(assignments
        .into_iter()
        .map(|a| {
            let assigned_to = a.assigned_to;
            let assigned_by = a.assigned_by;
            let society = a.society;
            let mut response = WorkAssignmentResponse::from(a);
            response.assigned_to_name = users.get(&assigned_to).map(|u| u.name.clone());
            response.assigned_by_name = users.get(&assigned_by).map(|u| u.name.clone());
            response.society_name = society_names.get(&society).cloned();
            response
        })
        .collect())
}

/// POST /api/work (authenticated)
/// Admins may assign freely; everyone else must outrank the assignee
/// within the society.
pub async fn create_assignment(
    db: web::Data<Database>,
    email_service: web::Data<EmailService>,
    user: AuthUser,
    req: web::Json<CreateAssignmentRequest>,
) -> Result<HttpResponse> {
    req.validate()?;

    let society_id = super::parse_object_id(&req.society)?;
    let assignee_id = super::parse_object_id(&req.assigned_to)?;
    let deadline = super::parse_datetime(&req.deadline)?;

    if user.role != UserRole::Admin {
        hierarchy::validate_assignment_hierarchy(db.get_ref(), user.id, assignee_id, society_id)
            .await?;
    }

    let society = society_repo::find(db.get_ref(), society_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Society not found".to_string()))?;
    let assignee = user_repo::find_by_id(db.get_ref(), assignee_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Assignee not found".to_string()))?;

    let now = DateTime::now();
    let assignment = WorkAssignment {
        id: ObjectId::new(),
        title: req.title.clone(),
        description: req.description.clone(),
        society: society_id,
        assigned_to: assignee_id,
        assigned_by: user.id,
        deadline,
        status: WorkStatus::Pending,
        visibility: req.visibility.unwrap_or(WorkVisibility::Private),
        feedback: None,
        is_deleted: false,
        created_at: now,
        updated_at: now,
    };

    work_repo::create(db.get_ref(), &assignment).await?;

    // Notify the assignee; a failed email never fails the assignment.
    let deadline_str = deadline.to_chrono().format("%Y-%m-%d").to_string();
    if let Err(e) = email_service
        .send_work_assignment_email(
            &assignee.email,
            &assignee.name,
            &user.name,
            &society.name,
            &assignment.title,
            &assignment.description,
            &deadline_str,
        )
        .await
    {
        tracing::warn!(email = %assignee.email, error = %e, "work assignment email failed");
    }

    let mut response = WorkAssignmentResponse::from(assignment);
    response.assigned_to_name = Some(assignee.name);
    response.assigned_by_name = Some(user.name);
    response.society_name = Some(society.name);

    Ok(HttpResponse::Created().json(response))
}

/// GET /api/work/my (authenticated)
pub async fn get_my_assignments(
    db: web::Data<Database>,
    user: AuthUser,
) -> Result<HttpResponse> {
    let assignments = work_repo::list_for_assignee(db.get_ref(), user.id).await?;
    let response = join_names(db.get_ref(), assignments).await?;
    Ok(HttpResponse::Ok().json(response))
}

/// GET /api/work/society/{society_id} (authenticated)
pub async fn get_society_assignments(
    db: web::Data<Database>,
    user: AuthUser,
    path: web::Path<String>,
) -> Result<HttpResponse> {
    let society_id = super::parse_object_id(&path.into_inner())?;
    let assignments =
        work_repo::list_for_society(db.get_ref(), society_id, user.id, user.is_admin()).await?;
    let response = join_names(db.get_ref(), assignments).await?;
    Ok(HttpResponse::Ok().json(response))
}

/// GET /api/work (admin)
pub async fn get_all_assignments(
    db: web::Data<Database>,
    user: AuthUser,
) -> Result<HttpResponse> {
    user.authorize(&[UserRole::Admin], &[UserPermission::ManageWork])?;

    let assignments = work_repo::list_all(db.get_ref()).await?;
    let response = join_names(db.get_ref(), assignments).await?;
    Ok(HttpResponse::Ok().json(response))
}

#[derive(Debug, Deserialize)]
pub struct UpdateStatusRequest {
    pub status: WorkStatus,
    pub feedback: Option<String>,
}

/// PATCH /api/work/{id}/status (assignee, assigner or admin)
pub async fn update_assignment_status(
    db: web::Data<Database>,
    user: AuthUser,
    path: web::Path<String>,
    req: web::Json<UpdateStatusRequest>,
) -> Result<HttpResponse> {
    let id = super::parse_object_id(&path.into_inner())?;

    let assignment = work_repo::find(db.get_ref(), id)
        .await?
        .ok_or_else(|| AppError::NotFound("Assignment not found".to_string()))?;

    if !user.is_admin() && assignment.assigned_to != user.id && assignment.assigned_by != user.id {
        return Err(AppError::Authorization(
            "You do not have permission to update this assignment".to_string(),
        ));
    }

    let updated = work_repo::update_status(
        db.get_ref(),
        id,
        req.status.as_str(),
        req.feedback.as_deref(),
    )
        .await?
        .ok_or_else(|| AppError::NotFound("Assignment not found".to_string()))?;

    Ok(HttpResponse::Ok().json(WorkAssignmentResponse::from(updated)))
}
