use connect_core::db::open_db_in_memory;
use connect_core::{
    EntityRepository, Organisation, QueryError, RepoError, SqliteOrganisationRepository,
    SqliteUserRepository, Status, User,
};

fn org(name: &str, status: Status) -> Organisation {
    Organisation::new(name, "1234567890", "ops@acme.io", status)
}

#[test]
fn create_and_get_organisation() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteOrganisationRepository::try_new(&conn).unwrap();

    let created = repo.create(&org("Acme", Status::Active)).unwrap();
    assert_eq!(created.id, Some(1));
    assert_eq!(created.contact_number, "1234567890");

    let loaded = repo.find_by_id(1).unwrap().unwrap();
    assert_eq!(loaded, created);
}

#[test]
fn name_and_status_filters_combine() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteOrganisationRepository::try_new(&conn).unwrap();

    repo.create(&org("Acme Corp", Status::Active)).unwrap();
    repo.create(&org("Acme Labs", Status::Inactive)).unwrap();
    repo.create(&org("Globex", Status::Active)).unwrap();

    let filter = Organisation {
        name: "Acme".to_string(),
        status: "active".to_string(),
        ..Organisation::default()
    };
    let found = repo.find(&filter).unwrap();

    assert_eq!(found.len(), 1);
    assert_eq!(found[0].name, "Acme Corp");
}

#[test]
fn status_filter_is_exact() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteOrganisationRepository::try_new(&conn).unwrap();

    repo.create(&org("Acme", Status::Inactive)).unwrap();

    // "active" is a substring of "inactive" but must not match it.
    let filter = Organisation {
        status: "active".to_string(),
        ..Organisation::default()
    };
    assert!(repo.find(&filter).unwrap().is_empty());
}

#[test]
fn contact_number_must_be_ten_digits() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteOrganisationRepository::try_new(&conn).unwrap();

    for contact in ["123456789", "12345678901", "12345abcde"] {
        let mut input = org("Acme", Status::Active);
        input.contact_number = contact.to_string();

        match repo.create(&input).unwrap_err() {
            RepoError::Validation(errors) => {
                assert_eq!(errors.len(), 1);
                assert_eq!(errors[0].field, "contact_number");
                assert_eq!(errors[0].message, "must be exactly 10 digits");
            }
            other => panic!("unexpected error for {contact}: {other}"),
        }
    }
}

#[test]
fn update_then_delete_organisation() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteOrganisationRepository::try_new(&conn).unwrap();
    let id = repo.create(&org("Acme", Status::Active)).unwrap().id.unwrap();

    let updated = repo
        .update_by_id(
            &Organisation {
                status: "inactive".to_string(),
                ..Organisation::default()
            },
            id,
        )
        .unwrap();
    assert_eq!(updated.status, "inactive");
    assert_eq!(updated.name, "Acme");

    repo.delete_by_id(id).unwrap();
    assert!(repo.find_by_id(id).unwrap().is_none());
    assert!(matches!(
        repo.delete_by_id(id).unwrap_err(),
        RepoError::NotFound(_)
    ));
    assert!(matches!(
        repo.update_by_id(&Organisation::default(), id).unwrap_err(),
        RepoError::Query(QueryError::EmptyUpdate)
    ));
}

#[test]
fn entity_tables_are_independent() {
    let conn = open_db_in_memory().unwrap();
    let orgs = SqliteOrganisationRepository::try_new(&conn).unwrap();
    let users = SqliteUserRepository::try_new(&conn).unwrap();

    let org_id = orgs.create(&org("Acme", Status::Active)).unwrap().id.unwrap();
    let user_id = users
        .create(&User::new(
            "Ann",
            "ann1",
            "9876543210",
            "a@x.com",
            Status::Active,
        ))
        .unwrap()
        .id
        .unwrap();

    // Both tables start their own id sequence.
    assert_eq!(org_id, 1);
    assert_eq!(user_id, 1);

    users.delete_by_id(user_id).unwrap();
    assert!(orgs.find_by_id(org_id).unwrap().is_some());
}
