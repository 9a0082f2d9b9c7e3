use broadside_core::catalog::raw::{
    RawAttackTarget, RawHealth, RawPhysics, RawProjectile, RawUnit, RawWeapon, RawWeaponMount,
    RawWeaponsBlock,
};
use broadside_core::{
    run_batch, Catalog, CatalogOptions, EncounterSpec, Engagement, EngagementConfig, FleetSpec,
};
use criterion::{black_box, criterion_group, criterion_main, Criterion};

fn unit(weapon: &str, hull: f64, speed: f64, tag: &str) -> RawUnit {
    RawUnit {
        ai_attack_target: RawAttackTarget {
            attack_priority: 1.0,
            attack_target_types: vec![tag.to_string()],
        },
        physics: Some(RawPhysics {
            max_linear_speed: speed,
            time_to_max_linear_speed: 2.0,
        }),
        weapons: Some(RawWeaponsBlock {
            weapons: vec![RawWeaponMount {
                weapon: weapon.to_string(),
            }],
        }),
        health: RawHealth {
            max_hull_points: hull,
            ..RawHealth::default()
        },
        ..RawUnit::default()
    }
}

fn catalog() -> Catalog {
    let torpedo = RawWeapon {
        salvo_size: 4,
        projectile: Some(RawProjectile {
            max_hull_points: 20.0,
            max_linear_speed: 1_200.0,
            ..RawProjectile::default()
        }),
        ..RawWeapon::default()
    }
    .with_damage(200.0)
    .with_range(4_000.0)
    .with_cooldown(8.0);
    let weapons = vec![
        (
            "frigate_autocannon".to_string(),
            RawWeapon::default()
                .with_damage(40.0)
                .with_range(1_500.0)
                .with_cooldown(1.0),
        ),
        ("cruiser_torpedo".to_string(), torpedo),
    ];
    let units = vec![
        ("frigate".to_string(), unit("frigate_autocannon", 1_200.0, 900.0, "frigate")),
        ("cruiser".to_string(), unit("cruiser_torpedo", 3_000.0, 500.0, "cruiser")),
    ];
    Catalog::build(weapons, units, &CatalogOptions::default()).expect("bench catalog")
}

fn bench_single_engagement(c: &mut Criterion) {
    let catalog = catalog();
    let config = EngagementConfig::default().with_repetitions(1).with_seed(1);
    let side_a = FleetSpec::default().with_ships("frigate", 20);
    let side_b = FleetSpec::default().with_ships("cruiser", 8);

    c.bench_function("engagement_20v8", |b| {
        b.iter(|| {
            let mut engagement =
                Engagement::new(&catalog, &side_a, &side_b, black_box(config)).expect("config");
            black_box(engagement.run())
        })
    });
}

fn bench_batch(c: &mut Criterion) {
    let catalog = catalog();
    let config = EngagementConfig::default().with_repetitions(5);
    let encounters: Vec<_> = (1..=8)
        .map(|n| {
            EncounterSpec::new(
                format!("{n} frigates vs 2 cruisers"),
                FleetSpec::default().with_ships("frigate", n),
                FleetSpec::default().with_ships("cruiser", 2),
            )
        })
        .collect();

    c.bench_function("batch_sequential", |b| {
        b.iter(|| black_box(run_batch(&catalog, &encounters, config, false)))
    });
    c.bench_function("batch_parallel", |b| {
        b.iter(|| black_box(run_batch(&catalog, &encounters, config, true)))
    });
}

criterion_group!(benches, bench_single_engagement, bench_batch);
criterion_main!(benches);
