#![allow(missing_docs)]
#![allow(clippy::float_cmp)]

use std::sync::{Arc, Mutex};

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use snake_evo::simulation::error::{ConfigError, Error};
use snake_evo::simulation::evolution::{self, BreedingPool};
use snake_evo::simulation::history::GenerationRecord;
use snake_evo::simulation::params::Params;
use snake_evo::simulation::population::Population;
use snake_evo::simulation::snake::{DeathCause, Perception, Scent};

fn create_test_params() -> Params {
    Params {
        snake_count: 4,
        grid_width: 10,
        grid_height: 10,
        layer_sizes: vec![30, 8, 4],
        breeding_pool_size: 4,
        seed: Some(7),
        ..Params::default()
    }
}

/// Runs until the current generation ends, forcing the end after a while.
fn finish_generation(population: &mut Population) -> GenerationRecord {
    for _ in 0..2_000 {
        if let Some(record) = population.tick().unwrap() {
            return record;
        }
    }
    population.transition().unwrap()
}

#[test]
fn test_population_creation() {
    let params = create_test_params();
    let population = Population::new(params.clone()).unwrap();

    assert_eq!(population.snakes().len(), 4);
    assert_eq!(population.live_count(), 4);
    assert_eq!(population.generation(), 1);
    assert_eq!(population.best_fitness(), 0.0);
    assert_eq!(population.leader(), 0);
    assert!(population.history().is_empty());
    assert_eq!(population.all_time_best(), &population.snakes()[0].brain);

    for snake in population.snakes() {
        assert!(snake.is_alive());
        assert_eq!(snake.brain.layer_sizes(), params.layer_sizes);
        assert_eq!(snake.hunger, params.initial_hunger);
    }
}

#[test]
fn test_transition_when_all_dead() {
    let mut population = Population::new(create_test_params()).unwrap();

    for (i, snake) in population.snakes_mut().iter_mut().enumerate() {
        snake.age = i as u32 + 1;
        snake.kill();
    }
    let top_brain = population.snakes()[3].brain.clone();

    let record = population.tick().unwrap().expect("generation should end");

    assert_eq!(population.snakes().len(), 4);
    assert_eq!(population.generation(), 2);
    assert_eq!(population.history().len(), 1);
    assert_eq!(population.history()[0], record);

    assert_eq!(record.generation, 1);
    assert_eq!(record.top_fitness, 8.0);
    assert_eq!(record.avg_fitness, 5.0);
    assert_eq!(record.top_length, 1);
    assert_eq!(record.avg_length, 1.0);
    assert!(record.elapsed_seconds >= 0.0);

    // elite slots: generation best, then all-time best
    assert_eq!(population.snakes()[0].brain, top_brain);
    assert_eq!(population.snakes()[1].brain, top_brain);
    assert_eq!(population.all_time_best(), &top_brain);
    assert_eq!(population.best_fitness(), 8.0);

    for snake in population.snakes() {
        assert!(snake.is_alive());
        assert_eq!(snake.age, 0);
        assert_eq!(snake.length, 1);
        assert!(snake.body.is_empty());
    }
    assert_eq!(population.leader(), 0);
}

#[test]
fn test_transition_ends_a_running_generation() {
    let mut population = Population::new(create_test_params()).unwrap();
    population.tick().unwrap();

    let record = population.transition().unwrap();

    assert_eq!(record.generation, 1);
    assert_eq!(population.generation(), 2);
    assert_eq!(population.live_count(), 4);
    assert_eq!(record.top_fitness, 2.0);
}

#[test]
fn test_best_fitness_non_decreasing() {
    let mut population = Population::new(create_test_params()).unwrap();
    let mut previous = population.best_fitness();

    for _ in 0..6 {
        let record = finish_generation(&mut population);

        assert!(population.best_fitness() >= previous);
        assert!(population.best_fitness() >= record.top_fitness);
        assert_eq!(population.snakes().len(), 4);
        previous = population.best_fitness();
    }

    assert_eq!(population.history().len(), 6);
    assert_eq!(population.generation(), 7);
    let generations: Vec<u32> = population.history().iter().map(|r| r.generation).collect();
    assert_eq!(generations, vec![1, 2, 3, 4, 5, 6]);
}

#[test]
fn test_observers_are_notified() {
    let mut population = Population::new(create_test_params()).unwrap();
    let seen = Arc::new(Mutex::new(Vec::new()));

    let sink = Arc::clone(&seen);
    population.subscribe(Box::new(move |record: &GenerationRecord| {
        sink.lock().unwrap().push(record.generation);
    }));

    finish_generation(&mut population);
    finish_generation(&mut population);

    assert_eq!(*seen.lock().unwrap(), vec![1, 2]);
}

#[test]
fn test_leader_tracking() {
    let mut population = Population::new(create_test_params()).unwrap();

    population.snakes_mut()[2].length = 3;
    population.tick().unwrap();
    assert_eq!(population.leader(), 2);

    population.snakes_mut()[2].kill();
    population.snakes_mut()[1].length = 5;
    population.tick().unwrap();
    assert_eq!(population.leader(), 1);
    assert!(population.best_length() >= 5);
}

#[test]
fn test_render_frame() {
    let mut population = Population::new(create_test_params()).unwrap();
    population.snakes_mut()[1].kill();

    let frame = population.render_frame();

    assert_eq!(frame.total, 4);
    assert_eq!(frame.live, 3);
    assert_eq!(frame.generation, 1);
    assert_eq!(frame.snakes.len(), 3);
    assert!(frame.snakes.iter().all(|s| s.alive && s.index != 1));
    assert_eq!(frame.snakes[0].position, population.snakes()[0].position);
    assert_eq!(frame.snakes[0].food, population.snakes()[0].food.pos);
}

#[test]
fn test_seeded_runs_are_reproducible() {
    let mut first = Population::new(create_test_params()).unwrap();
    let mut second = Population::new(create_test_params()).unwrap();

    for _ in 0..3 {
        finish_generation(&mut first);
        finish_generation(&mut second);
    }
    for _ in 0..20 {
        first.tick().unwrap();
        second.tick().unwrap();
    }

    for (a, b) in first.snakes().iter().zip(second.snakes()) {
        assert_eq!(a.brain, b.brain);
        assert_eq!(a.position, b.position);
        assert_eq!(a.body, b.body);
        assert_eq!(a.food, b.food);
    }
    let fitness = |p: &Population| p.history().iter().map(|r| r.top_fitness).collect::<Vec<_>>();
    assert_eq!(fitness(&first), fitness(&second));
}

#[test]
fn test_sensor_mismatch() {
    let params = Params {
        layer_sizes: vec![29, 8, 4],
        ..create_test_params()
    };

    assert!(matches!(
        Population::new(params),
        Err(Error::Config(ConfigError::SensorMismatch {
            sensors: 30,
            network: 29
        }))
    ));
}

#[test]
fn test_custom_perception_sets_input_size() {
    let params = Params {
        layer_sizes: vec![4, 4],
        ..create_test_params()
    };
    let perception = Perception::new(vec![Box::new(Scent::new())]);

    let mut population = Population::with_perception(params, perception).unwrap();
    population.tick().unwrap();
    assert_eq!(population.perception().total_input_size(population.params()), 4);
}

#[test]
fn test_invalid_configuration() {
    let params = Params {
        grid_width: 0,
        ..create_test_params()
    };
    assert!(matches!(
        Population::new(params),
        Err(Error::Config(ConfigError::InvalidGrid {
            width: 0,
            height: 10
        }))
    ));

    let params = Params {
        layer_sizes: vec![30, 8, 3],
        ..create_test_params()
    };
    assert!(matches!(
        Population::new(params),
        Err(Error::Config(ConfigError::OutputMismatch {
            expected: 4,
            actual: 3
        }))
    ));

    let params = Params {
        snake_count: 1,
        ..create_test_params()
    };
    assert!(matches!(
        Population::new(params),
        Err(Error::Config(ConfigError::InvalidParam(_)))
    ));
}

#[test]
fn test_default_params_are_valid() {
    Params::default().validate().unwrap();
    assert_eq!(Params::default().grid().unwrap().cell_count(), 2_500);
}

#[test]
fn test_params_load_from_file() {
    let path = "test_snake_params.json";
    std::fs::write(path, r#"{ "snake_count": 12, "grid_width": 20 }"#).unwrap();

    let params = Params::load_from_file(path).unwrap();
    std::fs::remove_file(path).unwrap();

    assert_eq!(params.snake_count, 12);
    assert_eq!(params.grid_width, 20);
    assert_eq!(params.grid_height, Params::default().grid_height);
    assert_eq!(params.layer_sizes, Params::default().layer_sizes);
}

#[test]
fn test_roulette_frequency() {
    let mut rng = ChaCha8Rng::seed_from_u64(21);
    let weights = [1.0, 0.6, 0.4];
    let total: f64 = weights.iter().sum();
    let draws = 40_000;

    let mut counts = [0usize; 3];
    for _ in 0..draws {
        counts[evolution::roulette(&weights, total, &mut rng)] += 1;
    }

    for (count, weight) in counts.iter().zip(weights) {
        let frequency = *count as f64 / draws as f64;
        assert!((frequency - weight / total).abs() < 0.015, "{counts:?}");
    }
}

#[test]
fn test_roulette_falls_back_to_top() {
    let mut rng = ChaCha8Rng::seed_from_u64(22);

    for _ in 0..100 {
        assert_eq!(evolution::roulette(&[0.0, 0.0, 0.0], 1.0, &mut rng), 0);
    }
}

#[test]
fn test_breeding_pool() {
    let mut population = Population::new(create_test_params()).unwrap();
    for (snake, age) in population.snakes_mut().iter_mut().zip([4, 2, 1, 1]) {
        snake.age = age;
        snake.kill();
    }
    assert!(population.snakes().iter().all(|s| s.death_cause() == Some(DeathCause::Killed)));

    let pool = BreedingPool::new(population.snakes(), 3);
    assert_eq!(pool.len(), 3);
    assert_eq!(pool.weights(), &[1.0, 0.5, 0.25]);
    assert_eq!(pool.total(), 1.75);

    let mut rng = ChaCha8Rng::seed_from_u64(23);
    let children = pool.breed(5, 0.1, 0.2, &mut rng).unwrap();
    assert_eq!(children.len(), 5);
    for child in &children {
        assert_eq!(child.shape(), population.snakes()[0].brain.shape());
    }
}

#[test]
fn test_breeding_pool_with_zero_fitness() {
    let mut population = Population::new(create_test_params()).unwrap();
    for snake in population.snakes_mut() {
        snake.kill();
    }

    let pool = BreedingPool::new(population.snakes(), 10);
    assert_eq!(pool.len(), 4);
    assert_eq!(pool.weights(), &[1.0; 4]);
}

#[test]
fn test_mutation_scale_annealing() {
    let params = Params::default();

    assert!((evolution::mutation_scale(&params, 0.0, 100) - 0.2).abs() < 1e-6);
    assert!((evolution::mutation_scale(&params, 50.0, 100) - 0.1).abs() < 1e-6);
    assert!((evolution::mutation_scale(&params, 99.0, 100) - 0.02).abs() < 1e-6);

    let fixed = Params {
        anneal_mutation: false,
        ..Params::default()
    };
    assert!((evolution::mutation_scale(&fixed, 99.0, 100) - 0.2).abs() < 1e-6);
}
