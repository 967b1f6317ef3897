#![cfg(feature = "test-utils")]

mod common;

use lightbnb_store::prelude::*;
use lightbnb_store::test_utils::{setup_postgres_embedded, stop_postgres_embedded};

use common::new_user;

#[test]
fn test01_users_lookup_and_create() -> Result<(), Box<dyn std::error::Error>> {
    let pg = setup_postgres_embedded("lightbnb_users")?;
    let cfg = pg.config.clone();

    let rt = tokio::runtime::Runtime::new()?;
    rt.block_on(async move {
        let store = LightBnbStore::connect(&cfg)?;

        // Absent email and id are explicit absence, not errors.
        assert_eq!(store.get_user_with_email("nobody@example.com").await?, None);
        assert_eq!(store.get_user_with_id(9_999).await?, None);
        // An id wider than the id column cannot exist either.
        assert_eq!(store.get_user_with_id(3_000_000_000).await?, None);

        let created = store
            .add_user(&new_user("Devin Sanders", "tristanjacobs@gmail.com"))
            .await?;
        assert!(created.id > 0);
        assert_eq!(created.name, "Devin Sanders");

        let by_email = store
            .get_user_with_email("tristanjacobs@gmail.com")
            .await?
            .expect("user just inserted");
        assert_eq!(by_email, created);

        let by_id = store.get_user_with_id(created.id).await?.expect("user by id");
        assert_eq!(by_id.email, "tristanjacobs@gmail.com");
        assert_eq!(by_id.password, created.password);

        // Lookup is exact; no case folding.
        assert_eq!(store.get_user_with_email("TristanJacobs@gmail.com").await?, None);

        // Duplicate email is a typed constraint failure.
        let err = store
            .add_user(&new_user("Someone Else", "tristanjacobs@gmail.com"))
            .await
            .unwrap_err();
        assert!(err.is_constraint_violation(), "{err}");
        assert!(!err.is_transport_failure());

        // Pool closed: a transport failure, distinguishable from "not found".
        store.close();
        let err = store
            .get_user_with_email("tristanjacobs@gmail.com")
            .await
            .unwrap_err();
        assert!(err.is_transport_failure(), "{err}");

        Ok::<(), StoreError>(())
    })?;

    stop_postgres_embedded(pg);
    Ok(())
}
