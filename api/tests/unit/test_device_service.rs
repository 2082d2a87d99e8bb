//! Device lifecycle service tests

use std::collections::HashSet;
use std::sync::Arc;

use devices_api::errors::DeviceError;
use devices_api::models::device::{
    DeviceChanges, DeviceState, LockRule, NewDevice, UpdateMode,
};
use devices_api::services::device_service::DeviceService;
use devices_api::storage::memory::MemoryDeviceStore;
use devices_api::storage::store::DeviceStore;
use uuid::Uuid;

fn create_test_service() -> (DeviceService, Arc<MemoryDeviceStore>) {
    let store = Arc::new(MemoryDeviceStore::new());
    (DeviceService::new(store.clone()), store)
}

#[tokio::test]
async fn test_create_and_get_by_id() {
    let (service, _) = create_test_service();

    let device = service
        .create(NewDevice::new("Router X", "Acme").with_state(DeviceState::Available))
        .await
        .unwrap();

    assert_eq!(device.name, "Router X");
    assert_eq!(device.brand, "Acme");
    assert_eq!(device.state, DeviceState::Available);

    let fetched = service.get_by_id(device.id).await.unwrap();
    assert_eq!(fetched, device);
}

#[tokio::test]
async fn test_create_defaults_to_available() {
    let (service, _) = create_test_service();
    let device = service.create(NewDevice::new("Sensor", "Acme")).await.unwrap();
    assert_eq!(device.state, DeviceState::Available);
}

#[tokio::test]
async fn test_create_rejects_invalid_labels() {
    let (service, store) = create_test_service();

    let empty = service.create(NewDevice::new("", "Acme")).await;
    assert!(matches!(empty, Err(DeviceError::Validation(_))));

    let long = service.create(NewDevice::new("Router", "a".repeat(101))).await;
    assert!(matches!(long, Err(DeviceError::Validation(_))));

    assert!(store.is_empty());
}

#[tokio::test]
async fn test_ids_are_unique() {
    let (service, _) = create_test_service();

    let mut ids = HashSet::new();
    for i in 0..50 {
        let device = service
            .create(NewDevice::new(format!("Device {}", i), "Acme"))
            .await
            .unwrap();
        assert!(ids.insert(device.id));
    }
    assert_eq!(service.get_all().await.unwrap().len(), 50);
}

#[tokio::test]
async fn test_get_by_id_not_found() {
    let (service, _) = create_test_service();
    let id = Uuid::new_v4();

    let result = service.get_by_id(id).await;
    assert!(matches!(result, Err(DeviceError::NotFound(missing)) if missing == id));
}

#[tokio::test]
async fn test_get_by_brand_is_case_insensitive() {
    let (service, _) = create_test_service();

    let first = service.create(NewDevice::new("A", "Acme")).await.unwrap();
    let second = service.create(NewDevice::new("B", "ACME")).await.unwrap();
    service.create(NewDevice::new("C", "Zenith")).await.unwrap();

    let devices = service.get_by_brand("acme").await.unwrap();
    let ids: HashSet<Uuid> = devices.iter().map(|d| d.id).collect();

    assert_eq!(devices.len(), 2);
    assert!(ids.contains(&first.id));
    assert!(ids.contains(&second.id));

    assert!(service.get_by_brand("Nokia").await.unwrap().is_empty());
}

#[tokio::test]
async fn test_get_by_state() {
    let (service, _) = create_test_service();

    service
        .create(NewDevice::new("A", "Acme").with_state(DeviceState::InUse))
        .await
        .unwrap();
    service.create(NewDevice::new("B", "Acme")).await.unwrap();

    let in_use = service.get_by_state(DeviceState::InUse).await.unwrap();
    assert_eq!(in_use.len(), 1);
    assert_eq!(in_use[0].name, "A");

    assert!(service
        .get_by_state(DeviceState::Inactive)
        .await
        .unwrap()
        .is_empty());
}

#[tokio::test]
async fn test_partial_update_applies_only_supplied_fields() {
    let (service, _) = create_test_service();
    let device = service.create(NewDevice::new("Router X", "Acme")).await.unwrap();

    let updated = service
        .update(
            device.id,
            DeviceChanges::default().name("Router Y"),
            UpdateMode::Partial,
        )
        .await
        .unwrap();

    assert_eq!(updated.name, "Router Y");
    assert_eq!(updated.brand, "Acme");
    assert_eq!(updated.state, DeviceState::Available);
    assert_eq!(updated.created_at, device.created_at);
    assert_eq!(service.get_by_id(device.id).await.unwrap(), updated);
}

#[tokio::test]
async fn test_partial_update_without_fields_is_noop() {
    let (service, _) = create_test_service();
    let device = service.create(NewDevice::new("Router X", "Acme")).await.unwrap();

    let updated = service
        .update(device.id, DeviceChanges::default(), UpdateMode::Partial)
        .await
        .unwrap();

    assert_eq!(updated, device);
}

#[tokio::test]
async fn test_in_use_partial_name_change_rejected() {
    let (service, _) = create_test_service();
    let device = service
        .create(NewDevice::new("Router X", "Acme").with_state(DeviceState::InUse))
        .await
        .unwrap();

    let result = service
        .update(
            device.id,
            DeviceChanges::default().name("New"),
            UpdateMode::Partial,
        )
        .await;

    match result {
        Err(DeviceError::InUse { rule, device: current }) => {
            assert_eq!(rule, LockRule::FieldLock);
            assert_eq!(*current, device);
        }
        other => panic!("expected InUse rejection, got {:?}", other),
    }

    let stored = service.get_by_id(device.id).await.unwrap();
    assert_eq!(stored.name, "Router X");
}

#[tokio::test]
async fn test_in_use_full_brand_change_rejected() {
    let (service, _) = create_test_service();
    let device = service
        .create(NewDevice::new("Router X", "Acme").with_state(DeviceState::InUse))
        .await
        .unwrap();

    let changes = DeviceChanges::default()
        .name("Router X")
        .brand("Zenith")
        .state(DeviceState::InUse);
    let result = service.update(device.id, changes, UpdateMode::Full).await;

    assert!(matches!(
        result,
        Err(DeviceError::InUse { rule: LockRule::FieldLock, .. })
    ));
    assert_eq!(service.get_by_id(device.id).await.unwrap(), device);
}

#[tokio::test]
async fn test_in_use_state_only_update_succeeds() {
    let (service, _) = create_test_service();
    let device = service
        .create(NewDevice::new("Router X", "Acme").with_state(DeviceState::InUse))
        .await
        .unwrap();

    let updated = service
        .update(
            device.id,
            DeviceChanges::default().state(DeviceState::Available),
            UpdateMode::Partial,
        )
        .await
        .unwrap();
    assert_eq!(updated.state, DeviceState::Available);

    let stored = service.get_by_id(device.id).await.unwrap();
    assert_eq!(stored.state, DeviceState::Available);
    assert_eq!(stored.created_at, device.created_at);
}

#[tokio::test]
async fn test_in_use_full_update_with_only_state_keeps_name_and_brand() {
    let (service, _) = create_test_service();
    let device = service
        .create(NewDevice::new("Router X", "Acme").with_state(DeviceState::InUse))
        .await
        .unwrap();

    // omitted name and brand resolve to the stored values, so the lock does not fire
    let updated = service
        .update(
            device.id,
            DeviceChanges::default().state(DeviceState::Available),
            UpdateMode::Full,
        )
        .await
        .unwrap();

    assert_eq!(updated.state, DeviceState::Available);
    assert_eq!(updated.name, "Router X");
    assert_eq!(updated.brand, "Acme");
    assert_eq!(updated.created_at, device.created_at);
    assert_eq!(service.get_by_id(device.id).await.unwrap(), updated);
}

#[tokio::test]
async fn test_in_use_full_update_with_current_values_succeeds() {
    let (service, _) = create_test_service();
    let device = service
        .create(NewDevice::new("Router X", "Acme").with_state(DeviceState::InUse))
        .await
        .unwrap();

    let changes = DeviceChanges::default()
        .name("Router X")
        .brand("Acme")
        .state(DeviceState::Inactive);
    let updated = service
        .update(device.id, changes, UpdateMode::Full)
        .await
        .unwrap();

    assert_eq!(updated.state, DeviceState::Inactive);
    assert_eq!(updated.name, "Router X");
}

#[tokio::test]
async fn test_full_update_is_idempotent() {
    let (service, _) = create_test_service();
    let device = service.create(NewDevice::new("Router X", "Acme")).await.unwrap();

    let changes = DeviceChanges::default()
        .name("Router Z")
        .brand("Zenith")
        .state(DeviceState::Inactive);

    let first = service
        .update(device.id, changes.clone(), UpdateMode::Full)
        .await
        .unwrap();
    let second = service
        .update(device.id, changes, UpdateMode::Full)
        .await
        .unwrap();

    assert_eq!(first, second);
    assert_eq!(second.created_at, device.created_at);
    assert_eq!(service.get_by_id(device.id).await.unwrap(), second);
}

#[tokio::test]
async fn test_update_rejects_invalid_labels() {
    let (service, _) = create_test_service();
    let device = service.create(NewDevice::new("Router X", "Acme")).await.unwrap();

    let result = service
        .update(
            device.id,
            DeviceChanges::default().brand(" "),
            UpdateMode::Partial,
        )
        .await;

    assert!(matches!(result, Err(DeviceError::Validation(_))));
    assert_eq!(service.get_by_id(device.id).await.unwrap(), device);
}

#[tokio::test]
async fn test_update_not_found() {
    let (service, _) = create_test_service();
    let result = service
        .update(
            Uuid::new_v4(),
            DeviceChanges::default().state(DeviceState::Inactive),
            UpdateMode::Partial,
        )
        .await;
    assert!(matches!(result, Err(DeviceError::NotFound(_))));
}

#[tokio::test]
async fn test_created_at_survives_updates() {
    let (service, _) = create_test_service();
    let device = service.create(NewDevice::new("Router X", "Acme")).await.unwrap();

    for state in [DeviceState::InUse, DeviceState::Inactive, DeviceState::Available] {
        let updated = service
            .update(
                device.id,
                DeviceChanges::default().state(state),
                UpdateMode::Partial,
            )
            .await
            .unwrap();
        assert_eq!(updated.created_at, device.created_at);
        assert_eq!(updated.id, device.id);
    }
}

#[tokio::test]
async fn test_delete_available_device() {
    let (service, store) = create_test_service();
    let device = service.create(NewDevice::new("Router X", "Acme")).await.unwrap();

    service.delete(device.id).await.unwrap();

    let result = service.get_by_id(device.id).await;
    assert!(matches!(result, Err(DeviceError::NotFound(_))));
    assert!(store.find_by_id(device.id).await.unwrap().is_none());
}

#[tokio::test]
async fn test_delete_in_use_device_rejected() {
    let (service, _) = create_test_service();
    let device = service
        .create(NewDevice::new("Router X", "Acme").with_state(DeviceState::InUse))
        .await
        .unwrap();

    let result = service.delete(device.id).await;
    assert!(matches!(
        result,
        Err(DeviceError::InUse { rule: LockRule::DeleteLock, .. })
    ));

    assert_eq!(service.get_by_id(device.id).await.unwrap(), device);
}

#[tokio::test]
async fn test_delete_not_found() {
    let (service, _) = create_test_service();
    let result = service.delete(Uuid::new_v4()).await;
    assert!(matches!(result, Err(DeviceError::NotFound(_))));
}
