mod common;

use chrono::Utc;
use common::{register, setup, setup_file, stored_rating};
use ladder::services::errors::match_service_errors::MatchServiceError;
use ladder::Player;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

#[tokio::test]
async fn test_even_players_move_sixteen_points() -> anyhow::Result<()> {
    let ladder = setup().await?;
    let blanc = register(&ladder, "blanc").await?;
    let noir = register(&ladder, "noir").await?;

    let mut game = ladder.matches.create(&blanc, &noir).await?;
    let resolution = ladder.matches.resolve_outcome(&mut game, false, 3).await?;

    assert_eq!(resolution.delta.winner, 16.0);
    assert_eq!(resolution.delta.loser, -16.0);
    assert_eq!(game.second_player().rating(), 1016.0);
    assert_eq!(game.first_player().rating(), 984.0);
    assert_eq!(stored_rating(&ladder, "noir").await?, 1016.0);
    assert_eq!(stored_rating(&ladder, "blanc").await?, 984.0);

    let stored = ladder.matches.load(game.id()).await?.unwrap();
    assert_eq!(stored.winner().map(|p| p.login()), Some("noir"));
    assert_eq!(stored.loser().map(|p| p.login()), Some("blanc"));
    assert_eq!(stored.remaining_pieces(), Some(3));
    Ok(())
}

#[tokio::test]
async fn test_created_match_is_unresolved() -> anyhow::Result<()> {
    let ladder = setup().await?;
    let blanc = register(&ladder, "blanc").await?;
    let noir = register(&ladder, "noir").await?;

    let before = Utc::now();
    let game = ladder.matches.create_for_tournament(&blanc, &noir, 12).await?;

    let stored = ladder.matches.load(game.id()).await?.unwrap();
    assert!(!stored.is_resolved());
    assert!(stored.winner().is_none());
    assert!(stored.remaining_pieces().is_none());
    assert_eq!(stored.tournament_id(), Some(12));
    assert!(stored.created_at() >= before);
    assert_eq!(stored.first_player(), &blanc);
    assert_eq!(stored.second_player(), &noir);
    Ok(())
}

#[tokio::test]
async fn test_identifiers_ascend_and_history_is_ordered() -> anyhow::Result<()> {
    let ladder = setup().await?;
    let blanc = register(&ladder, "blanc").await?;
    let noir = register(&ladder, "noir").await?;
    let gris = register(&ladder, "gris").await?;

    let first = ladder.matches.create(&blanc, &noir).await?;
    let second = ladder.matches.create(&gris, &noir).await?;
    let third = ladder.matches.create(&noir, &blanc).await?;
    assert!(first.id() < second.id() && second.id() < third.id());

    let ids: Vec<i64> = ladder
        .matches
        .history("blanc")
        .await?
        .iter()
        .map(|m| m.id())
        .collect();
    assert_eq!(ids, vec![first.id(), third.id()]);
    assert!(ladder.matches.load(third.id() + 1).await?.is_none());
    Ok(())
}

#[tokio::test]
async fn test_player_cannot_face_themselves() -> anyhow::Result<()> {
    let ladder = setup().await?;
    let blanc = register(&ladder, "blanc").await?;

    let result = ladder.matches.create(&blanc, &blanc).await;
    assert!(matches!(result, Err(MatchServiceError::SameOpponent)));
    assert!(ladder.matches.history("blanc").await?.is_empty());
    Ok(())
}

#[tokio::test]
async fn test_unregistered_player_is_a_storage_error() -> anyhow::Result<()> {
    let ladder = setup().await?;
    let blanc = register(&ladder, "blanc").await?;
    let ghost = Player::new("ghost".to_string(), "pw", "ghost@example.org".to_string());

    let result = ladder.matches.create(&blanc, &ghost).await;
    assert!(matches!(result, Err(MatchServiceError::StorageError(_))));
    Ok(())
}

#[tokio::test]
async fn test_second_resolution_is_rejected() -> anyhow::Result<()> {
    let ladder = setup().await?;
    let blanc = register(&ladder, "blanc").await?;
    let noir = register(&ladder, "noir").await?;

    let created = ladder.matches.create(&blanc, &noir).await?;
    let mut stale = ladder.matches.load(created.id()).await?.unwrap();
    let mut game = created;
    ladder.matches.resolve_outcome(&mut game, true, 4).await?;

    let again = ladder.matches.resolve_outcome(&mut game, false, 1).await;
    assert!(matches!(again, Err(MatchServiceError::AlreadyResolved)));

    let from_stale = ladder.matches.resolve_outcome(&mut stale, false, 1).await;
    assert!(matches!(from_stale, Err(MatchServiceError::AlreadyResolved)));
    assert!(!stale.is_resolved());

    assert_eq!(stored_rating(&ladder, "blanc").await?, 1016.0);
    assert_eq!(stored_rating(&ladder, "noir").await?, 984.0);
    let stored = ladder.matches.load(game.id()).await?.unwrap();
    assert_eq!(stored.winner().map(|p| p.login()), Some("blanc"));
    assert_eq!(stored.remaining_pieces(), Some(4));
    Ok(())
}

#[tokio::test]
async fn test_negative_remaining_pieces_rejected() -> anyhow::Result<()> {
    let ladder = setup().await?;
    let blanc = register(&ladder, "blanc").await?;
    let noir = register(&ladder, "noir").await?;

    let mut game = ladder.matches.create(&blanc, &noir).await?;
    let result = ladder.matches.resolve_outcome(&mut game, true, -2).await;
    assert!(matches!(result, Err(MatchServiceError::ValidationError(_))));
    assert!(!ladder.matches.load(game.id()).await?.unwrap().is_resolved());
    Ok(())
}

#[tokio::test]
async fn test_resolving_deleted_match() -> anyhow::Result<()> {
    let ladder = setup().await?;
    let blanc = register(&ladder, "blanc").await?;
    let noir = register(&ladder, "noir").await?;
    let mut game = ladder.matches.create(&blanc, &noir).await?;

    sqlx::query("DELETE FROM matches WHERE id = ?")
        .bind(game.id())
        .execute(&ladder.pool)
        .await?;

    let result = ladder.matches.resolve_outcome(&mut game, true, 0).await;
    assert!(matches!(result, Err(MatchServiceError::MatchNotFound)));
    assert!(!game.is_resolved());
    assert_eq!(stored_rating(&ladder, "blanc").await?, 1000.0);
    Ok(())
}

#[tokio::test]
async fn test_failed_rating_write_rolls_everything_back() -> anyhow::Result<()> {
    let ladder = setup().await?;
    let blanc = register(&ladder, "blanc").await?;
    let noir = register(&ladder, "noir").await?;
    let mut game = ladder.matches.create(&blanc, &noir).await?;

    sqlx::query(
        "CREATE TRIGGER reject_loser_update BEFORE UPDATE OF rating ON players
         WHEN NEW.login = 'blanc'
         BEGIN SELECT RAISE(ABORT, 'rating write failed'); END",
    )
    .execute(&ladder.pool)
    .await?;

    let result = ladder.matches.resolve_outcome(&mut game, false, 2).await;
    assert!(matches!(result, Err(MatchServiceError::StorageError(_))));
    assert!(!game.is_resolved());
    assert_eq!(game.second_player().rating(), 1000.0);

    assert!(!ladder.matches.load(game.id()).await?.unwrap().is_resolved());
    assert_eq!(stored_rating(&ladder, "noir").await?, 1000.0);
    assert_eq!(stored_rating(&ladder, "blanc").await?, 1000.0);

    sqlx::query("DROP TRIGGER reject_loser_update")
        .execute(&ladder.pool)
        .await?;
    ladder.matches.resolve_outcome(&mut game, false, 2).await?;
    assert_eq!(stored_rating(&ladder, "noir").await?, 1016.0);
    Ok(())
}

#[tokio::test]
async fn test_ratings_stay_zero_sum_over_random_matches() -> anyhow::Result<()> {
    let ladder = setup().await?;
    let logins = ["alpha", "bravo", "charlie", "delta", "echo", "foxtrot"];
    let mut players = Vec::new();
    for login in logins {
        players.push(register(&ladder, login).await?);
    }
    let mut rng = StdRng::seed_from_u64(0x1adde5);

    for _ in 0..40 {
        let first = rng.gen_range(0..players.len());
        let mut second = rng.gen_range(0..players.len() - 1);
        if second >= first {
            second += 1;
        }
        let mut game = ladder.matches.create(&players[first], &players[second]).await?;
        let resolution = ladder
            .matches
            .resolve_outcome(&mut game, rng.gen_bool(0.5), rng.gen_range(0..16))
            .await?;
        assert!((resolution.delta.winner + resolution.delta.loser).abs() < 1e-9);

        let total: f64 = ladder
            .players
            .load_all_by_rating()
            .await?
            .iter()
            .map(|p| p.rating())
            .sum();
        assert!((total - 1000.0 * logins.len() as f64).abs() < 1e-6);
    }

    assert_eq!(
        ladder
            .rankings
            .by_matches_played()
            .await?
            .iter()
            .map(|s| s.count)
            .sum::<u32>(),
        80
    );
    Ok(())
}

#[tokio::test]
async fn test_concurrent_disjoint_resolutions() -> anyhow::Result<()> {
    let ladder = setup().await?;
    let a = register(&ladder, "a").await?;
    let b = register(&ladder, "b").await?;
    let c = register(&ladder, "c").await?;
    let d = register(&ladder, "d").await?;
    let first = ladder.matches.create(&a, &b).await?;
    let second = ladder.matches.create(&c, &d).await?;

    let mut handles = Vec::new();
    for (game, first_player_won) in [(first, true), (second, false)] {
        let matches = ladder.matches.clone();
        handles.push(tokio::spawn(async move {
            let mut game = game;
            matches
                .resolve_outcome(&mut game, first_player_won, 5)
                .await
                .map(|_| game)
        }));
    }
    for handle in handles {
        assert!(handle.await??.is_resolved());
    }

    assert_eq!(stored_rating(&ladder, "a").await?, 1016.0);
    assert_eq!(stored_rating(&ladder, "b").await?, 984.0);
    assert_eq!(stored_rating(&ladder, "c").await?, 984.0);
    assert_eq!(stored_rating(&ladder, "d").await?, 1016.0);
    Ok(())
}

#[tokio::test]
async fn test_concurrent_overlapping_resolutions_serialize() -> anyhow::Result<()> {
    let ladder = setup().await?;
    let a = register(&ladder, "a").await?;
    let b = register(&ladder, "b").await?;
    let c = register(&ladder, "c").await?;
    let games = vec![
        ladder.matches.create(&a, &b).await?,
        ladder.matches.create(&a, &c).await?,
    ];

    let mut handles = Vec::new();
    for game in games {
        let matches = ladder.matches.clone();
        handles.push(tokio::spawn(async move {
            let mut game = game;
            matches.resolve_outcome(&mut game, true, 1).await
        }));
    }
    for handle in handles {
        handle.await??;
    }

    let a = stored_rating(&ladder, "a").await?;
    let b = stored_rating(&ladder, "b").await?;
    let c = stored_rating(&ladder, "c").await?;
    assert!((a + b + c - 3000.0).abs() < 1e-6);
    assert!(a > 1016.0 && a < 1032.0);
    Ok(())
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_overlapping_resolutions_on_shared_file_database() -> anyhow::Result<()> {
    let dir = tempfile::tempdir()?;
    let ladder = setup_file(&dir, 8).await?;
    assert_eq!(ladder.pool.options().get_max_connections(), 8);

    let logins = ["alpha", "bravo", "charlie", "delta"];
    let mut players = Vec::new();
    for login in logins {
        players.push(register(&ladder, login).await?);
    }
    let mut games = Vec::new();
    for i in 0..40 {
        let offset = 1 + (i / players.len()) % (players.len() - 1);
        let first = &players[i % players.len()];
        let second = &players[(i + offset) % players.len()];
        games.push(ladder.matches.create(first, second).await?);
    }

    let mut rng = StdRng::seed_from_u64(40);
    let mut handles = Vec::new();
    for game in games {
        let matches = ladder.matches.clone();
        let first_player_won = rng.gen_bool(0.5);
        handles.push(tokio::spawn(async move {
            let mut game = game;
            matches.resolve_outcome(&mut game, first_player_won, 3).await
        }));
    }
    for handle in handles {
        handle.await??;
    }

    let total: f64 = ladder
        .players
        .load_all_by_rating()
        .await?
        .iter()
        .map(|p| p.rating())
        .sum();
    assert!((total - 1000.0 * logins.len() as f64).abs() < 1e-6);

    let won: u32 = ladder
        .rankings
        .by_matches_won()
        .await?
        .iter()
        .map(|s| s.count)
        .sum();
    assert_eq!(won, 40);
    for login in logins {
        assert!(ladder
            .matches
            .history(login)
            .await?
            .iter()
            .all(|game| game.is_resolved()));
    }
    Ok(())
}
