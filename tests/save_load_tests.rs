#![allow(missing_docs)]
#![allow(clippy::float_cmp)]

use std::fs;

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use snake_evo::simulation::brain::{ActivationKind, NeuralNetwork};
use snake_evo::simulation::error::{Error, PersistenceError};
use snake_evo::simulation::params::Params;
use snake_evo::simulation::population::Population;
use snake_evo::simulation::snake::DeathCause;
use snake_evo::simulation::snapshot::PopulationSnapshot;
use snake_evo::simulation::vector::Vector;

fn create_test_params() -> Params {
    Params {
        snake_count: 6,
        grid_width: 12,
        grid_height: 12,
        layer_sizes: vec![30, 6, 4],
        breeding_pool_size: 4,
        seed: Some(3),
        ..Params::default()
    }
}

fn create_test_population() -> Population {
    let mut population = Population::new(create_test_params()).unwrap();
    for _ in 0..5 {
        population.tick().unwrap();
    }
    population
}

fn max_weight_difference(a: &PopulationSnapshot, b: &PopulationSnapshot) -> f32 {
    a.snakes
        .iter()
        .zip(&b.snakes)
        .flat_map(|(x, y)| x.brain.layers().iter().zip(y.brain.layers()))
        .flat_map(|(x, y)| {
            x.weights
                .iter()
                .zip(y.weights.iter())
                .chain(x.biases.iter().zip(y.biases.iter()))
                .map(|(p, q)| (p - q).abs())
                .collect::<Vec<_>>()
        })
        .fold(0.0, f32::max)
}

#[test]
fn test_save_and_load() {
    let original = create_test_population();
    let save_path = "test_snake_save_and_load.json";

    original.save_to_file(save_path).unwrap();

    let mut loaded = Population::new(Params {
        seed: Some(99),
        ..create_test_params()
    })
    .unwrap();
    let result = loaded.load_from_file(save_path);
    fs::remove_file(save_path).unwrap();
    result.unwrap();

    assert_eq!(loaded.generation(), original.generation());
    assert_eq!(loaded.leader(), original.leader());
    assert_eq!(loaded.best_length(), original.best_length());
    assert_eq!(loaded.best_fitness(), original.best_fitness());
    assert_eq!(loaded.live_count(), original.live_count());
    assert_eq!(loaded.history().len(), original.history().len());

    for (a, b) in original.snakes().iter().zip(loaded.snakes()) {
        assert_eq!(a.position, b.position);
        assert_eq!(a.velocity, b.velocity);
        assert_eq!(a.body, b.body);
        assert_eq!(a.length, b.length);
        assert_eq!(a.hunger, b.hunger);
        assert_eq!(a.age, b.age);
        assert_eq!(a.food, b.food);
        assert_eq!(a.is_alive(), b.is_alive());
        assert_eq!(a.fitness(), b.fitness());
        assert_eq!(a.brain.shape(), b.brain.shape());
    }

    assert!(max_weight_difference(&original.export(), &loaded.export()) < 1e-6);
}

#[test]
fn test_save_creates_valid_json() {
    let population = create_test_population();
    let save_path = "test_snake_valid_json.json";

    population.save_to_file(save_path).unwrap();
    let json = fs::read_to_string(save_path).unwrap();
    fs::remove_file(save_path).unwrap();

    let value: serde_json::Value = serde_json::from_str(&json).unwrap();
    for key in [
        "snakes",
        "history",
        "best_length",
        "best_fitness",
        "generation",
        "all_time_best",
        "leader",
        "generation_started",
    ] {
        assert!(value.get(key).is_some(), "missing {key}");
    }

    let snakes = value["snakes"].as_array().unwrap();
    assert_eq!(snakes.len(), 6);
    for key in ["position", "velocity", "body", "length", "alive", "brain", "age", "fitness"] {
        assert!(snakes[0].get(key).is_some(), "missing snake field {key}");
    }
    assert_eq!(value["generation"], population.generation());
}

#[test]
fn test_load_nonexistent_file() {
    let mut population = create_test_population();

    let result = population.load_from_file("nonexistent_snake_file.json");
    assert!(matches!(
        result,
        Err(Error::Persistence(PersistenceError::Io(_)))
    ));
}

#[test]
fn test_load_invalid_json() {
    let mut population = create_test_population();
    let before = population.export();
    let save_path = "test_snake_invalid.json";

    fs::write(save_path, "{ this is not json").unwrap();
    let result = population.load_from_file(save_path);
    fs::remove_file(save_path).unwrap();

    assert!(matches!(
        result,
        Err(Error::Persistence(PersistenceError::Json(_)))
    ));
    assert_eq!(population.export(), before);
}

#[test]
fn test_import_rejects_inconsistent_snapshots() {
    let mut population = create_test_population();
    let before = population.export();

    let corruptions: [fn(&mut PopulationSnapshot); 12] = [
        |s| {
            s.snakes.pop();
        },
        |s| s.snakes[0].position = Vector::new(-1, 0),
        |s| s.snakes[1].food = Vector::new(0, 12),
        |s| s.snakes[2].velocity = Vector::new(1, 1),
        |s| s.snakes[0].length = 0,
        |s| {
            s.snakes[0].alive = false;
            s.snakes[0].fitness = None;
        },
        |s| {
            s.snakes[1].alive = false;
            s.snakes[1].fitness = Some(4.0);
            s.snakes[1].death = None;
        },
        |s| {
            s.snakes[2].alive = true;
            s.snakes[2].fitness = None;
            s.snakes[2].death = Some(DeathCause::Collision);
        },
        |s| {
            let snake = &mut s.snakes[3];
            let head = snake.position;
            let food = if head.x > 0 {
                Vector::new(head.x - 1, head.y)
            } else {
                Vector::new(head.x + 1, head.y)
            };
            snake.food = food;
            snake.body = vec![food, head];
            snake.length = 2;
        },
        |s| s.leader = 6,
        |s| s.best_fitness = f64::NAN,
        |s| s.generation = 0,
    ];

    for corrupt in corruptions {
        let mut snapshot = population.export();
        corrupt(&mut snapshot);

        let result = population.import(snapshot);
        assert!(matches!(
            result,
            Err(Error::Persistence(PersistenceError::Invalid(_)))
        ));
        assert_eq!(population.export(), before);
    }
}

#[test]
fn test_import_rejects_foreign_brain() {
    let mut population = create_test_population();
    let before = population.export();

    let mut rng = ChaCha8Rng::seed_from_u64(1);
    let mut snapshot = population.export();
    snapshot.snakes[3].brain =
        NeuralNetwork::from_sizes(&[30, 5, 4], ActivationKind::Relu, &mut rng).unwrap();

    assert!(matches!(
        population.import(snapshot),
        Err(Error::Persistence(PersistenceError::Invalid(_)))
    ));
    assert_eq!(population.export(), before);
}

#[test]
fn test_import_restores_dead_snakes() {
    let mut source = create_test_population();
    source.snakes_mut()[1].kill();
    let snapshot = source.export();

    let mut target = Population::new(create_test_params()).unwrap();
    target.import(snapshot).unwrap();

    let restored = &target.snakes()[1];
    assert!(!restored.is_alive());
    assert!(restored.death_cause().is_some());
    assert_eq!(restored.death_cause(), source.snakes()[1].death_cause());
    assert_eq!(restored.fitness(), source.snakes()[1].fitness());
    assert_eq!(target.live_count(), source.live_count());
}

#[test]
fn test_load_and_continue_simulation() {
    let original = create_test_population();
    let save_path = "test_snake_continue.json";
    original.save_to_file(save_path).unwrap();

    let mut loaded = Population::new(create_test_params()).unwrap();
    let result = PopulationSnapshot::load_from_file(save_path);
    fs::remove_file(save_path).unwrap();
    loaded.import(result.unwrap()).unwrap();

    for _ in 0..2 {
        let ended = (0..2_000).any(|_| loaded.tick().unwrap().is_some());
        if !ended {
            loaded.transition().unwrap();
        }
    }

    assert_eq!(loaded.snakes().len(), 6);
    assert!(loaded.generation() > original.generation());
    assert!(loaded.best_fitness() >= original.best_fitness());
}
