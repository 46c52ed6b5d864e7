use mockall::predicate;
use mockall::Sequence;
use pretty_assertions::assert_eq;
use slotbook_core::filter::SlotFilter;
use slotbook_core::models::dashboard::SlotSummary;
use slotbook_core::notices;
use slotbook_core::schedule;
use slotbook_db::models::{DbAppointmentSlot, DbSlotWithUser};
use uuid::Uuid;

use crate::test_utils::{date, provider_fixture, slot_fixture, time, user_fixture, TestContext};

fn with_user(slot: &DbAppointmentSlot, user_name: Option<(&str, &str)>) -> DbSlotWithUser {
    DbSlotWithUser {
        id: slot.id,
        provider_id: slot.provider_id,
        provider_first_name: slot.provider_first_name.clone(),
        provider_last_name: slot.provider_last_name.clone(),
        category: slot.category.clone(),
        appointment_name: slot.appointment_name.clone(),
        date: slot.date,
        start_time: slot.start_time,
        end_time: slot.end_time,
        is_booked: user_name.is_some(),
        created_at: slot.created_at,
        user_first_name: user_name.map(|(first, _)| first.to_string()),
        user_last_name: user_name.map(|(_, last)| last.to_string()),
    }
}

// Expired slots disappear from user-facing listings but stay on the
// administrator's audit view.
#[tokio::test]
async fn test_expired_slots_hidden_except_for_admin() {
    let mut ctx = TestContext::new();
    let provider = provider_fixture();

    let stale = slot_fixture(
        &provider,
        "Old checkup",
        date(2025, 6, 30),
        time(9, 0),
        time(9, 30),
    );
    let upcoming = slot_fixture(
        &provider,
        "New checkup",
        date(2025, 7, 2),
        time(9, 0),
        time(9, 30),
    );
    let now = date(2025, 7, 1).and_hms_opt(12, 0, 0).unwrap();

    let unbooked = vec![stale.clone(), upcoming.clone()];
    ctx.slot_repo
        .expect_list_unbooked()
        .times(1)
        .returning(move || Ok(unbooked.clone()));

    let everything = vec![with_user(&stale, None), with_user(&upcoming, None)];
    ctx.slot_repo
        .expect_list_all()
        .times(1)
        .returning(move || Ok(everything.clone()));

    // User view applies the expiry predicate
    let visible: Vec<SlotSummary> = ctx
        .slot_repo
        .list_unbooked()
        .await
        .unwrap()
        .into_iter()
        .filter(|slot| !schedule::is_expired(slot.date, slot.end_time, now))
        .map(|slot| slot.to_summary(None).unwrap())
        .collect();
    assert_eq!(visible.len(), 1);
    assert_eq!(visible[0].appointment_name, "New checkup");

    // Admin audit view does not
    let audited = ctx.slot_repo.list_all().await.unwrap();
    assert_eq!(audited.len(), 2);
}

// Drains are destructive, and a message enqueued after a drain survives
// for the next one.
#[tokio::test]
async fn test_mailbox_drain_contract() {
    let mut ctx = TestContext::new();
    let owner_id = Uuid::new_v4();
    let mut seq = Sequence::new();

    ctx.mailbox_repo
        .expect_drain_all()
        .with(predicate::eq(owner_id))
        .times(1)
        .in_sequence(&mut seq)
        .returning(|_| Ok(vec!["first".to_string(), "second".to_string()]));
    ctx.mailbox_repo
        .expect_enqueue()
        .with(predicate::eq(owner_id), predicate::eq("third".to_string()))
        .times(1)
        .in_sequence(&mut seq)
        .returning(|_, _| Ok(()));
    ctx.mailbox_repo
        .expect_drain_all()
        .with(predicate::eq(owner_id))
        .times(1)
        .in_sequence(&mut seq)
        .returning(|_| Ok(vec!["third".to_string()]));
    ctx.mailbox_repo
        .expect_drain_all()
        .with(predicate::eq(owner_id))
        .times(1)
        .in_sequence(&mut seq)
        .returning(|_| Ok(vec![]));

    // First drain empties the mailbox in FIFO order
    let drained = ctx.mailbox_repo.drain_all(owner_id).await.unwrap();
    assert_eq!(drained, vec!["first".to_string(), "second".to_string()]);

    // A notice enqueued after the drain survives to the next drain
    ctx.mailbox_repo
        .enqueue(owner_id, "third".to_string())
        .await
        .unwrap();
    let drained = ctx.mailbox_repo.drain_all(owner_id).await.unwrap();
    assert_eq!(drained, vec!["third".to_string()]);

    // And is not delivered twice
    let drained = ctx.mailbox_repo.drain_all(owner_id).await.unwrap();
    assert!(drained.is_empty());
}

// Provider cancels a booked slot: the user hears about it by name and the
// slot vanishes from the provider's listing.
#[tokio::test]
async fn test_provider_cancellation_notifies_and_removes() {
    let mut ctx = TestContext::new();
    let provider = provider_fixture();
    let user = user_fixture();
    let slot = slot_fixture(
        &provider,
        "Checkup",
        date(2025, 7, 1),
        time(9, 0),
        time(9, 30),
    );

    let body = notices::canceled_by_provider(
        &slot.appointment_name,
        &slot.provider_first_name,
        &slot.provider_last_name,
        slot.date,
        slot.start_time,
        slot.end_time,
    );
    assert!(body.contains("Checkup"));
    assert!(body.contains(&format!(
        "{} {}",
        provider.first_name, provider.last_name
    )));

    let mut seq = Sequence::new();
    ctx.mailbox_repo
        .expect_enqueue()
        .with(predicate::eq(user.id), predicate::eq(body.clone()))
        .times(1)
        .in_sequence(&mut seq)
        .returning(|_, _| Ok(()));
    ctx.slot_repo
        .expect_delete_slot()
        .with(predicate::eq(slot.id))
        .times(1)
        .in_sequence(&mut seq)
        .returning(|_| Ok(()));
    ctx.slot_repo
        .expect_list_by_provider()
        .with(predicate::eq(provider.id))
        .times(1)
        .in_sequence(&mut seq)
        .returning(|_| Ok(vec![]));

    ctx.mailbox_repo.enqueue(user.id, body).await.unwrap();
    ctx.slot_repo.delete_slot(slot.id).await.unwrap();

    let remaining = ctx.slot_repo.list_by_provider(provider.id).await.unwrap();
    assert!(remaining.is_empty());
}

// Search narrows listings without mutating anything.
#[test]
fn test_dashboard_filtering() {
    let provider = provider_fixture();
    let checkup = slot_fixture(
        &provider,
        "Checkup",
        date(2025, 7, 1),
        time(9, 0),
        time(9, 30),
    );
    let cleaning = slot_fixture(
        &provider,
        "Cleaning",
        date(2025, 7, 2),
        time(10, 0),
        time(10, 30),
    );

    let summaries: Vec<SlotSummary> = [&checkup, &cleaning]
        .iter()
        .map(|slot| slot.to_summary(None).unwrap())
        .collect();

    let filter = SlotFilter {
        search: Some("checkup".to_string()),
        category: None,
        date: None,
    };
    let matched: Vec<&SlotSummary> = summaries.iter().filter(|s| filter.matches(s)).collect();
    assert_eq!(matched.len(), 1);
    assert_eq!(matched[0].appointment_name, "Checkup");

    let filter = SlotFilter {
        search: None,
        category: None,
        date: Some(date(2025, 7, 2)),
    };
    let matched: Vec<&SlotSummary> = summaries.iter().filter(|s| filter.matches(s)).collect();
    assert_eq!(matched.len(), 1);
    assert_eq!(matched[0].appointment_name, "Cleaning");
}
