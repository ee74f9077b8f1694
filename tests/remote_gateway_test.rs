mod support;

use intake::backend::{BackendError, GatewayError, ImportsGateway, LocalModeReason};
use intake::models::{CreateImport, ImportStatus, ImportType, StatusFilter};
use support::{remote_config, sample_import, tracing_init, FakeBackend};

fn create_input(name: &str) -> CreateImport {
    CreateImport {
        name: name.to_string(),
        import_type: ImportType::Csv,
        status: None,
        progress: None,
    }
}

async fn remote_gateway() -> (FakeBackend, ImportsGateway, tempfile::TempDir) {
    tracing_init();
    let fake = FakeBackend::spawn().await;
    let dir = tempfile::tempdir().unwrap();
    let gateway = ImportsGateway::new(&remote_config(&fake.base_url, &dir));
    (fake, gateway, dir)
}

#[tokio::test]
async fn create_inserts_remotely_and_skips_local_storage() {
    let (fake, gateway, dir) = remote_gateway().await;

    let record = gateway.create(create_input("remote import")).await;

    let rows = fake.rows();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].id, record.id);
    assert_eq!(rows[0].status, ImportStatus::Completed);

    assert!(
        !dir.path().join("imports.json").exists(),
        "nothing should reach the local slot on a healthy remote"
    );
    assert_eq!(*gateway.local_mode().borrow(), None);
}

#[tokio::test]
async fn get_by_id_round_trips_through_the_backend() {
    let (_fake, gateway, _dir) = remote_gateway().await;

    let record = gateway.create(create_input("lookup me")).await;
    let fetched = gateway.get_by_id(&record.id).await.expect("record exists");
    assert_eq!(fetched, record);

    assert!(gateway
        .get_by_id("6a0f2b9c-8a1c-4a77-bf63-1f1f6f9f0e49")
        .await
        .is_none());
}

#[tokio::test]
async fn paged_listing_reports_the_filter_wide_total() {
    let (fake, gateway, _dir) = remote_gateway().await;

    for i in 0..4 {
        fake.seed_row(sample_import(
            &format!("done-{}", i),
            ImportStatus::Completed,
            i,
        ));
    }
    for i in 0..3 {
        fake.seed_row(sample_import(
            &format!("broken-{}", i),
            ImportStatus::Failed,
            10 + i,
        ));
    }

    let all = gateway.list_page(5, 0, StatusFilter::All, "").await;
    assert_eq!(all.total, 7);
    assert_eq!(all.items.len(), 5);

    let rest = gateway.list_page(5, 5, StatusFilter::All, "").await;
    assert_eq!(rest.total, 7);
    assert_eq!(rest.items.len(), 2);

    let failed = gateway
        .list_page(5, 0, StatusFilter::Only(ImportStatus::Failed), "")
        .await;
    assert_eq!(failed.total, 3);
    assert!(failed.items.iter().all(|i| i.status == ImportStatus::Failed));
}

#[tokio::test]
async fn remote_search_matches_names_and_exact_uuids() {
    let (fake, gateway, _dir) = remote_gateway().await;

    let invoice = sample_import("Invoice Q1", ImportStatus::Completed, 0);
    let receipts = sample_import("Receipts", ImportStatus::Completed, 1);
    fake.seed_row(invoice.clone());
    fake.seed_row(receipts.clone());

    let by_name = gateway.list_page(10, 0, StatusFilter::All, "inv").await;
    assert_eq!(by_name.total, 1);
    assert_eq!(by_name.items[0].id, invoice.id);

    let by_id = gateway
        .list_page(10, 0, StatusFilter::All, &receipts.id)
        .await;
    assert_eq!(by_id.total, 1);
    assert_eq!(by_id.items[0].id, receipts.id);
}

#[tokio::test]
async fn deleting_a_missing_record_raises_instead_of_resolving_silently() {
    let (_fake, gateway, _dir) = remote_gateway().await;

    let err = gateway
        .delete("c0e1b1de-0000-4000-8000-000000000000")
        .await
        .expect_err("zero affected rows must fail");
    assert!(matches!(
        err,
        GatewayError::Backend(BackendError::NothingDeleted)
    ));
}

#[tokio::test]
async fn delete_removes_the_record_and_its_stored_file() {
    let (fake, gateway, _dir) = remote_gateway().await;

    let record = gateway.create(create_input("with file")).await;
    gateway
        .upload_file(&record.id, "data.csv", b"a,b\n1,2\n".to_vec())
        .await
        .expect("upload succeeds");
    assert_eq!(fake.object_paths().len(), 1);

    gateway.delete(&record.id).await.expect("delete succeeds");

    assert!(fake.rows().is_empty());
    assert!(
        fake.object_paths().is_empty(),
        "stored file should be cleaned up after delete"
    );
}

#[tokio::test]
async fn file_info_is_idempotent_and_reflects_upserts() {
    let (_fake, gateway, _dir) = remote_gateway().await;

    let record = gateway.create(create_input("uploads")).await;
    gateway
        .upload_file(&record.id, "data.csv", b"123".to_vec())
        .await
        .expect("upload succeeds");

    let first = gateway.file_info(&record.id).await.expect("file is stored");
    let second = gateway.file_info(&record.id).await.expect("file is stored");
    assert_eq!(first, second);
    assert_eq!(first.name, "data.csv");
    assert_eq!(first.size, Some(3));

    // re-uploading the same name replaces the content, not adds a copy
    gateway
        .upload_file(&record.id, "data.csv", b"12345".to_vec())
        .await
        .expect("upsert succeeds");
    let after = gateway.file_info(&record.id).await.expect("file is stored");
    assert_eq!(after.name, "data.csv");
    assert_eq!(after.size, Some(5));
}

#[tokio::test]
async fn signed_download_url_serves_the_stored_bytes() {
    let (_fake, gateway, _dir) = remote_gateway().await;

    let record = gateway.create(create_input("download me")).await;
    let content = b"a,b\n1,2\n".to_vec();
    gateway
        .upload_file(&record.id, "data.csv", content.clone())
        .await
        .expect("upload succeeds");

    let url = gateway
        .file_download_url(&record.id)
        .await
        .expect("signed url resolves");
    let fetched = reqwest::get(&url).await.unwrap().bytes().await.unwrap();
    assert_eq!(fetched.to_vec(), content);

    assert!(gateway.file_download_url("no-such-import").await.is_none());
}

#[tokio::test]
async fn remote_failure_falls_back_to_local_and_raises_the_notice() {
    let (fake, gateway, _dir) = remote_gateway().await;

    fake.set_fail_rest(true);

    // create still hands back a record, persisted to the local slot
    let record = gateway.create(create_input("stranded")).await;
    assert!(fake.rows().is_empty());

    let all = gateway.list_all().await;
    assert_eq!(all.len(), 1);
    assert_eq!(all[0].id, record.id);

    let page = gateway.list_page(5, 0, StatusFilter::All, "").await;
    assert_eq!(page.total, 1);

    assert_eq!(
        *gateway.local_mode().borrow(),
        Some(LocalModeReason::RemoteError)
    );

    // the remote recovering does not rewrite history: the stranded record
    // only exists locally
    fake.set_fail_rest(false);
    assert!(gateway.get_by_id(&record.id).await.is_none());
}
