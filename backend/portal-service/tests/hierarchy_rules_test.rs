//! Hierarchy rules behind work assignment.

use portal_service::models::MemberDesignation::{self, *};
use portal_service::services::hierarchy::{can_assign, designation_rank};

const ALL: [MemberDesignation; 8] = [
    President,
    VicePresident,
    GeneralSecretary,
    AssistantGeneralSecretary,
    OrganizingSecretary,
    PublicationSecretary,
    SportsSecretary,
    ExecutiveMember,
];

#[test]
fn president_outranks_everyone_else() {
    for designation in ALL {
        if designation != President {
            assert!(
                can_assign(President, designation),
                "president should outrank {:?}",
                designation
            );
        }
    }
}

#[test]
fn executive_member_can_assign_nobody() {
    for designation in ALL {
        assert!(
            !can_assign(ExecutiveMember, designation),
            "executive member must not assign to {:?}",
            designation
        );
    }
}

#[test]
fn assignment_is_antisymmetric() {
    // If A can assign to B, B must not be able to assign to A.
    for a in ALL {
        for b in ALL {
            if can_assign(a, b) {
                assert!(
                    !can_assign(b, a),
                    "{:?} and {:?} can both assign to each other",
                    a,
                    b
                );
            }
        }
    }
}

#[test]
fn peers_cannot_assign_to_each_other() {
    let peer_pairs = [
        (VicePresident, GeneralSecretary),
        (OrganizingSecretary, PublicationSecretary),
        (SportsSecretary, AssistantGeneralSecretary),
    ];
    for (a, b) in peer_pairs {
        assert_eq!(designation_rank(a), designation_rank(b));
        assert!(!can_assign(a, b));
        assert!(!can_assign(b, a));
    }
}

#[test]
fn secretaries_manage_executive_members() {
    for secretary in [
        GeneralSecretary,
        AssistantGeneralSecretary,
        OrganizingSecretary,
        PublicationSecretary,
        SportsSecretary,
    ] {
        assert!(can_assign(secretary, ExecutiveMember));
    }
}
