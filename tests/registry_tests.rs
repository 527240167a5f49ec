mod common;

use common::seeded_registry;
use rbz_host::error::{Error, Result};
use rbz_host::hosting::HostingProviderId;
use rbz_host::scheduler::PendingTransition;
use rbz_host::server::{
    CreateServerSpec, Edition, HostingKind, LifecycleAction, MemorySize, MemoryUsage,
    PlayerCounts, ServerAddress, ServerStatus, ServerUpdate,
};

fn is_demo_host(host: &str) -> bool {
    let Some(token) = host.strip_suffix(".rbz.host") else {
        return false;
    };
    (1..=10).contains(&token.len())
        && token
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit())
}

#[test]
fn test_create_demo_java_server() {
    let mut registry = seeded_registry();

    let spec = CreateServerSpec {
        name: "My World".to_string(),
        edition: Edition::Java,
        hosting: HostingKind::Demo,
        memory_size: MemorySize::Mb2048,
        max_players: 20,
        ..Default::default()
    };
    let server = registry.create(spec);

    assert!(is_demo_host(&server.address.host), "{}", server.address.host);
    assert_eq!(server.address.host, "myworld.rbz.host");
    assert!((25565..30000).contains(&server.address.port));
    assert_eq!(server.status(), ServerStatus::Offline);
    assert_eq!(server.players, PlayerCounts { online: 0, max: 20 });
    assert_eq!(server.memory, MemoryUsage { used_mb: 0, total_mb: 2048 });
    assert!(server.last_online_at().is_none());
    assert_eq!(registry.len(), 1);
}

#[test]
fn test_bedrock_ports_in_range() {
    let mut registry = seeded_registry();

    for i in 0..200 {
        let spec = CreateServerSpec::named(format!("Pocket {}", i)).with_edition(Edition::Bedrock);
        let server = registry.create(spec);
        assert!((19132..20000).contains(&server.address.port));
        assert!(is_demo_host(&server.address.host));
        assert_eq!(server.version, "1.21.80");
    }
}

#[test]
fn test_real_server_uses_custom_address() {
    let mut registry = seeded_registry();

    let spec = CreateServerSpec {
        name: "Family".to_string(),
        hosting: HostingKind::Real,
        hosting_provider: Some(HostingProviderId::Custom),
        custom_host: Some("mc.example.org".to_string()),
        custom_port: Some(25570),
        ..Default::default()
    };
    let server = registry.create(spec);

    assert_eq!(
        server.address,
        ServerAddress {
            host: "mc.example.org".to_string(),
            port: 25570
        }
    );
    assert_eq!(server.hosting(), HostingKind::Real);
}

#[test]
fn test_incomplete_custom_address_falls_back_to_generated() {
    let mut registry = seeded_registry();

    let real_without_port = CreateServerSpec {
        name: "Realm".to_string(),
        hosting: HostingKind::Real,
        hosting_provider: Some(HostingProviderId::Aternos),
        custom_host: Some("realm.aternos.me".to_string()),
        ..Default::default()
    };
    assert!(is_demo_host(&registry.create(real_without_port).address.host));

    // Demo servers ignore custom addresses entirely
    let demo_with_address = CreateServerSpec {
        name: "Demo".to_string(),
        custom_host: Some("ignored.example".to_string()),
        custom_port: Some(1),
        ..Default::default()
    };
    assert_eq!(registry.create(demo_with_address).address.host, "demo.rbz.host");
}

#[test]
fn test_create_preserves_insertion_order_and_unique_ids() {
    let mut registry = seeded_registry();
    let names = ["Alpha", "Bravo", "Charlie"];
    for name in names {
        registry.create(CreateServerSpec::named(name));
    }

    let listed: Vec<_> = registry.list().iter().map(|s| s.name.as_str()).collect();
    assert_eq!(listed, names);

    let list = registry.list();
    assert_ne!(list[0].id(), list[1].id());
    assert_ne!(list[1].id(), list[2].id());
}

#[test]
fn test_start_goes_online_after_three_ticks() -> Result<()> {
    let mut registry = seeded_registry();
    let id = registry.create(CreateServerSpec::named("Lobby")).id();

    registry.start(id)?;
    assert_eq!(registry.status(id)?, ServerStatus::Starting);
    assert_eq!(
        registry.pending_transition(id),
        Some((PendingTransition::FinishStart, 3))
    );

    registry.advance(2);
    assert_eq!(registry.status(id)?, ServerStatus::Starting);

    assert_eq!(registry.advance(1), 1);
    let server = registry.get(id).unwrap();
    assert_eq!(server.status(), ServerStatus::Online);
    assert_eq!(server.players, PlayerCounts { online: 0, max: 20 });
    assert_eq!(server.last_online_at(), Some(registry.now()));
    assert!(registry.pending_transition(id).is_none());

    Ok(())
}

#[test]
fn test_stop_resets_players_and_memory() -> Result<()> {
    let mut registry = seeded_registry();
    let spec = CreateServerSpec {
        name: "Big".to_string(),
        memory_size: MemorySize::Mb8192,
        max_players: 100,
        ..Default::default()
    };
    let id = registry.create(spec).id();
    registry.start(id)?;
    registry.advance(3);

    registry.update(
        id,
        ServerUpdate {
            players: Some(PlayerCounts { online: 7, max: 100 }),
            memory: Some(MemoryUsage { used_mb: 3000, total_mb: 8192 }),
            ..Default::default()
        },
    )?;

    registry.stop(id)?;
    assert_eq!(registry.status(id)?, ServerStatus::Stopping);

    registry.advance(1);
    assert_eq!(registry.status(id)?, ServerStatus::Stopping);
    registry.advance(1);

    let server = registry.get(id).unwrap();
    assert_eq!(server.status(), ServerStatus::Offline);
    assert_eq!(server.memory, MemoryUsage { used_mb: 0, total_mb: 2048 });
    assert_eq!(server.players, PlayerCounts { online: 0, max: 20 });

    Ok(())
}

#[test]
fn test_restart_passes_through_each_state() -> Result<()> {
    let mut registry = seeded_registry();
    let id = registry.create(CreateServerSpec::named("Hub")).id();
    registry.start(id)?;
    registry.advance(3);
    let first_online = registry.get(id).unwrap().last_online_at();

    let busy = PlayerCounts { online: 12, max: 50 };
    registry.update(
        id,
        ServerUpdate {
            players: Some(busy),
            ..Default::default()
        },
    )?;

    registry.restart(id)?;
    assert_eq!(registry.status(id)?, ServerStatus::Stopping);

    registry.advance(2);
    assert_eq!(registry.status(id)?, ServerStatus::Starting);
    assert_eq!(
        registry.pending_transition(id),
        Some((PendingTransition::FinishRestart, 8))
    );

    registry.advance(2);
    assert_eq!(registry.status(id)?, ServerStatus::Starting);
    registry.advance(1);

    let server = registry.get(id).unwrap();
    assert_eq!(server.status(), ServerStatus::Online);
    assert_eq!(server.players, busy);
    assert!(server.last_online_at() > first_online);

    Ok(())
}

#[test]
fn test_restart_completes_in_one_large_advance() -> Result<()> {
    let mut registry = seeded_registry();
    let id = registry.create(CreateServerSpec::named("Hub")).id();
    registry.start(id)?;
    registry.advance(3);

    registry.restart(id)?;
    assert_eq!(registry.advance(10), 2);
    assert_eq!(registry.status(id)?, ServerStatus::Online);
    assert_eq!(registry.elapsed_ticks(), 13);

    Ok(())
}

#[test]
fn test_run_until_idle_reports_elapsed_ticks() -> Result<()> {
    let mut registry = seeded_registry();
    let id = registry.create(CreateServerSpec::named("Hub")).id();
    registry.start(id)?;
    assert_eq!(registry.run_until_idle(), 3);

    registry.restart(id)?;
    assert_eq!(registry.run_until_idle(), 5);
    assert_eq!(registry.status(id)?, ServerStatus::Online);
    assert_eq!(registry.run_until_idle(), 0);

    Ok(())
}

#[test]
fn test_overlapping_transitions_rejected() -> Result<()> {
    let mut registry = seeded_registry();
    let id = registry.create(CreateServerSpec::named("Busy")).id();

    assert!(matches!(
        registry.stop(id),
        Err(Error::InvalidTransition {
            action: LifecycleAction::Stop,
            status: ServerStatus::Offline,
            ..
        })
    ));
    assert!(matches!(registry.restart(id), Err(Error::InvalidTransition { .. })));

    registry.start(id)?;
    assert!(matches!(
        registry.start(id),
        Err(Error::InvalidTransition {
            status: ServerStatus::Starting,
            ..
        })
    ));
    assert!(matches!(registry.stop(id), Err(Error::InvalidTransition { .. })));

    // The original timer is untouched
    registry.advance(3);
    assert_eq!(registry.status(id)?, ServerStatus::Online);
    assert!(matches!(registry.start(id), Err(Error::InvalidTransition { .. })));

    Ok(())
}

#[test]
fn test_unknown_server_errors() {
    let mut registry = seeded_registry();
    let id = registry.create(CreateServerSpec::named("Gone")).id();
    registry.remove(id);

    assert!(matches!(registry.start(id), Err(Error::ServerNotFound(_))));
    assert!(matches!(registry.status(id), Err(Error::ServerNotFound(_))));
    assert!(matches!(
        registry.update(id, ServerUpdate::default()),
        Err(Error::ServerNotFound(_))
    ));
}

#[test]
fn test_remove_unknown_is_noop() {
    let mut registry = seeded_registry();
    let id = registry.create(CreateServerSpec::named("Keep")).id();
    let other = registry.create(CreateServerSpec::named("Drop")).id();

    assert!(registry.remove(other).is_some());
    assert!(registry.remove(other).is_none());
    assert_eq!(registry.len(), 1);
    assert!(registry.get(id).is_some());
}

#[test]
fn test_remove_drops_pending_transition() -> Result<()> {
    let mut registry = seeded_registry();
    let id = registry.create(CreateServerSpec::named("Short lived")).id();
    registry.start(id)?;

    registry.remove(id);
    assert!(registry.pending_transition(id).is_none());
    assert_eq!(registry.advance(5), 0);
    assert!(registry.is_empty());

    Ok(())
}

#[test]
fn test_update_merges_only_set_fields() -> Result<()> {
    let mut registry = seeded_registry();
    let spec = CreateServerSpec {
        name: "Before".to_string(),
        motd: Some("hello".to_string()),
        ..Default::default()
    };
    let id = registry.create(spec).id();
    let original = registry.get(id).unwrap().clone();

    let updated = registry.update(
        id,
        ServerUpdate {
            name: Some("After".to_string()),
            address: Some(ServerAddress {
                host: "play.example.net".to_string(),
                port: 25600,
            }),
            motd: Some(None),
            pvp: Some(false),
            ..Default::default()
        },
    )?;

    assert_eq!(updated.name, "After");
    assert_eq!(updated.address.to_string(), "play.example.net:25600");
    assert!(updated.motd.is_none());
    assert!(!updated.pvp);
    assert_eq!(updated.id(), original.id());
    assert_eq!(updated.version, original.version);
    assert_eq!(updated.status(), ServerStatus::Offline);
    assert_eq!(updated.created_at(), original.created_at());

    Ok(())
}

#[test]
fn test_update_rejects_impossible_counts() -> Result<()> {
    let mut registry = seeded_registry();
    let id = registry.create(CreateServerSpec::named("Counts")).id();
    let original = registry.get(id).unwrap().clone();

    let overfull = registry.update(
        id,
        ServerUpdate {
            name: Some("Renamed".to_string()),
            players: Some(PlayerCounts { online: 50, max: 20 }),
            ..Default::default()
        },
    );
    assert!(matches!(overfull, Err(Error::Validation(_))));

    let overcommitted = registry.update(
        id,
        ServerUpdate {
            memory: Some(MemoryUsage {
                used_mb: 9999,
                total_mb: 3,
            }),
            ..Default::default()
        },
    );
    assert!(matches!(overcommitted, Err(Error::Validation(_))));

    // Rejected updates leave the record and the event log alone
    assert_eq!(registry.get(id), Some(&original));
    assert_eq!(registry.events().server_events(id, None).len(), 1);

    let full = registry.update(
        id,
        ServerUpdate {
            players: Some(PlayerCounts { online: 20, max: 20 }),
            ..Default::default()
        },
    )?;
    assert_eq!(full.players.online, 20);

    Ok(())
}

#[test]
fn test_clock_saturates_at_the_far_future() -> Result<()> {
    let mut registry = seeded_registry();
    let id = registry.create(CreateServerSpec::named("Far")).id();

    registry.advance(10_000_000_000_000);
    let later = registry.now();
    assert!(later > registry.get(id).unwrap().created_at());

    registry.advance(u64::MAX);
    assert_eq!(registry.elapsed_ticks(), u64::MAX);
    assert!(registry.now() >= later);

    registry.start(id)?;
    assert_eq!(
        registry.pending_transition(id),
        Some((PendingTransition::FinishStart, u64::MAX))
    );
    registry.run_until_idle();
    assert_eq!(registry.status(id)?, ServerStatus::Online);

    registry.restart(id)?;
    registry.run_until_idle();
    assert_eq!(registry.status(id)?, ServerStatus::Online);

    Ok(())
}

#[test]
fn test_from_config_str_applies_timing_and_domain() -> Result<()> {
    let mut registry = rbz_host::ServerRegistry::from_config_str(
        r#"{
            "baseDomain": "play.test",
            "timing": { "startTicks": 1, "stopTicks": 4 },
            "portSeed": 9
        }"#,
    )?;

    let id = registry.create(CreateServerSpec::named("Quick")).id();
    assert_eq!(registry.get(id).unwrap().address.host, "quick.play.test");

    registry.start(id)?;
    registry.advance(1);
    assert_eq!(registry.status(id)?, ServerStatus::Online);

    registry.stop(id)?;
    registry.advance(3);
    assert_eq!(registry.status(id)?, ServerStatus::Stopping);
    registry.advance(1);
    assert_eq!(registry.status(id)?, ServerStatus::Offline);

    Ok(())
}

#[test]
fn test_same_seed_same_ports() {
    let mut a = seeded_registry();
    let mut b = seeded_registry();
    for name in ["One", "Two", "Three"] {
        let pa = a.create(CreateServerSpec::named(name)).address.port;
        let pb = b.create(CreateServerSpec::named(name)).address.port;
        assert_eq!(pa, pb);
    }
}
