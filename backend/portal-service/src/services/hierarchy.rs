/// Committee hierarchy rules for work assignment.
use mongodb::bson::oid::ObjectId;
use mongodb::Database;
use once_cell::sync::Lazy;
use std::collections::HashMap;

use crate::db::society_repo;
use crate::error::{AppError, Result};
use crate::models::MemberDesignation;

static DESIGNATION_RANK: Lazy<HashMap<MemberDesignation, u32>> = Lazy::new(|| {
    HashMap::from([
        (MemberDesignation::President, 100),
        (MemberDesignation::VicePresident, 90),
        (MemberDesignation::GeneralSecretary, 90),
        (MemberDesignation::SportsSecretary, 80),
        (MemberDesignation::OrganizingSecretary, 80),
        (MemberDesignation::PublicationSecretary, 80),
        (MemberDesignation::AssistantGeneralSecretary, 80),
        (MemberDesignation::ExecutiveMember, 10),
    ])
});

pub fn designation_rank(designation: MemberDesignation) -> u32 {
    DESIGNATION_RANK.get(&designation).copied().unwrap_or(0)
}

/// Pure rank comparison: an assigner may only delegate downward.
pub fn can_assign(assigner: MemberDesignation, assignee: MemberDesignation) -> bool {
    designation_rank(assigner) > designation_rank(assignee)
}

/// Validates that the assigner outranks the assignee within the society.
/// Both must be current members; equal rank is a violation.
pub async fn validate_assignment_hierarchy(
    db: &Database,
    assigner_id: ObjectId,
    assignee_id: ObjectId,
    society_id: ObjectId,
) -> Result<()> {
    let (assigner, assignee) = futures::try_join!(
        society_repo::find_current_member(db, society_id, assigner_id),
        society_repo::find_current_member(db, society_id, assignee_id),
    )?;

    let assigner = assigner.ok_or_else(|| {
        AppError::Authorization("Assigner is not a current member of this society".to_string())
    })?;

    let assignee = assignee.ok_or_else(|| {
        AppError::BadRequest("Assignee is not a current member of this society".to_string())
    })?;

    if !can_assign(assigner.designation, assignee.designation) {
        return Err(AppError::Authorization(format!(
            "Hierarchy Violation: A {} cannot assign work to a {}",
            assigner.designation.as_str(),
            assignee.designation.as_str()
        )));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use MemberDesignation::*;

    #[test]
    fn test_rank_table() {
        assert_eq!(designation_rank(President), 100);
        assert_eq!(designation_rank(VicePresident), 90);
        assert_eq!(designation_rank(GeneralSecretary), 90);
        assert_eq!(designation_rank(AssistantGeneralSecretary), 80);
        assert_eq!(designation_rank(OrganizingSecretary), 80);
        assert_eq!(designation_rank(PublicationSecretary), 80);
        assert_eq!(designation_rank(SportsSecretary), 80);
        assert_eq!(designation_rank(ExecutiveMember), 10);
    }

    #[test]
    fn test_president_assigns_down() {
        assert!(can_assign(President, VicePresident));
        assert!(can_assign(President, ExecutiveMember));
    }

    #[test]
    fn test_equal_rank_is_a_violation() {
        assert!(!can_assign(VicePresident, GeneralSecretary));
        assert!(!can_assign(OrganizingSecretary, PublicationSecretary));
        assert!(!can_assign(President, President));
    }

    #[test]
    fn test_upward_assignment_is_a_violation() {
        assert!(!can_assign(ExecutiveMember, President));
        assert!(!can_assign(SportsSecretary, GeneralSecretary));
    }
}
