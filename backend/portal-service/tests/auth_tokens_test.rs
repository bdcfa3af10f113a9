//! Token lifecycle across the access/refresh pair.

use mongodb::bson::oid::ObjectId;
use portal_service::models::UserRole;
use portal_service::security::jwt;

fn init_keys() {
    // First caller wins; later calls are redundant but harmless for tests.
    let _ = jwt::initialize_secrets(
        "integration-access-secret",
        "integration-refresh-secret",
        900,
        604_800,
    );
}

#[test]
fn full_token_round_trip() {
    init_keys();
    let user_id = ObjectId::new();

    let pair = jwt::generate_token_pair(user_id, UserRole::Teacher, "prof@univ.edu")
        .expect("pair should be generated");

    let access = jwt::validate_access_token(&pair.access_token)
        .expect("access token should validate")
        .claims;
    assert_eq!(access.sub, user_id.to_hex());
    assert_eq!(access.role, UserRole::Teacher);
    assert_eq!(access.email, "prof@univ.edu");

    let refresh = jwt::validate_refresh_token(&pair.refresh_token)
        .expect("refresh token should validate")
        .claims;
    assert_eq!(refresh.sub, access.sub);
    assert!(refresh.exp > access.exp);
}

#[test]
fn tokens_do_not_cross_validate() {
    init_keys();
    let pair = jwt::generate_token_pair(ObjectId::new(), UserRole::Student, "s@univ.edu")
        .expect("pair should be generated");

    assert!(jwt::validate_access_token(&pair.refresh_token).is_err());
    assert!(jwt::validate_refresh_token(&pair.access_token).is_err());
}

#[test]
fn tampered_token_rejected() {
    init_keys();
    let token = jwt::generate_access_token(ObjectId::new(), UserRole::Student, "s@univ.edu")
        .expect("token should be generated");

    let mut tampered = token.clone();
    tampered.truncate(token.len() - 2);
    tampered.push_str("xx");

    assert!(jwt::validate_access_token(&tampered).is_err());
}

#[test]
fn subject_parses_back_to_object_id() {
    init_keys();
    let user_id = ObjectId::new();
    let token = jwt::generate_access_token(user_id, UserRole::Admin, "a@univ.edu")
        .expect("token should be generated");

    assert_eq!(jwt::user_id_from_token(&token).expect("subject parses"), user_id);
}
