// Integration tests for Boardgame Recs

use boardgame_recs::config::{PathSettings, Settings};
use boardgame_recs::core::{BrowseFilter, ComplexityBand};
use boardgame_recs::models::GameRecord;
use boardgame_recs::services::{pipeline, store};
use std::fs;
use tempfile::TempDir;

const COLLECTION_CSV: &str = "\
objectid,objectname,rating,numplays,avgweight,minplayers,maxplayers,playingtime,yearpublished,average,itemtype,bggbestplayers,bggrecplayers,own,prevowned,want,wanttobuy,wanttoplay,wishlist
174430,Gloomhaven,9,12,3.9,1,4,120,2017,8.6,standalone,3,\"1,2,3,4\",1,0,0,0,0,0
31260,Agricola,7,3,3.6,1,5,150,2007,7.9,standalone,4,\"1,2,3,4,5\",0,1,0,0,0,0
13,Catan,5,40,2.3,3,4,120,1995,7.1,standalone,4,\"3,4\",1,0,0,0,0,0
342942,Ark Nova,,0,3.8,1,4,150,2021,8.5,standalone,2,\"1,2,3,4\",0,0,1,0,0,0
";

const RANKINGS_CSV: &str = "\
id,name,yearpublished,rank,bayesaverage,average,usersrated,is_expansion,abstracts_rank,cgs_rank,childrensgames_rank,familygames_rank,partygames_rank,strategygames_rank,thematic_rank,wargames_rank
224517,Brass: Birmingham,2018,1,8.4,8.59,50000,0,,,,,,1,,
174430,Gloomhaven,2017,2,8.3,8.6,60000,0,,,,,,2,1,
342942,Ark Nova,2021,3,8.3,8.5,45000,0,,,,,,3,,
999001,Ark Nova: Marine Worlds,2022,0,0,8.8,5000,1,,,,,,,,
999002,Gloomhaven: Forgotten Circles,2019,4,7.9,8.4,9000,1,,,,,,,,
266192,Wingspan,2019,25,8.0,8.05,90000,0,,,,3,,20,,
266192,Wingspan,2019,26,8.0,8.05,90000,0,,,,3,,20,,
31260,Agricola,2007,40,7.8,7.9,70000,0,,,,,,30,,
12345,Unranked Prototype,2023,,,7.0,10,0,,,,,,,,
54321,Obscure Party Game,2010,7000,5.6,6.1,300,0,,,,,900,,,
178900,Codenames,2015,120,7.5,7.6,100000,0,,,,,5,,,
";

fn settings_in(dir: &TempDir) -> Settings {
    let root = dir.path();
    fs::write(root.join("collection.csv"), COLLECTION_CSV).unwrap();
    fs::write(root.join("ranks.csv"), RANKINGS_CSV).unwrap();

    let mut settings = Settings {
        paths: PathSettings {
            collection: root.join("collection.csv"),
            rankings: root.join("ranks.csv"),
            profile: root.join("preference_profile.json"),
            exclusions: root.join("excluded-game-ids.json"),
            owned_games: root.join("owned-games.json"),
            output: root.join("bgg-recommendations.json"),
            corrections: root.join("bgg-id-corrections.csv"),
        },
        ..Settings::default()
    };
    settings.pipeline.fallback_year = Some(2026);
    settings
}

fn run_all(settings: &Settings) -> Vec<GameRecord> {
    pipeline::build_profile(settings).unwrap();
    pipeline::build_exclusions(settings).unwrap();
    pipeline::run_recommendations(settings).unwrap();
    store::load_records(&settings.paths.output).unwrap().unwrap()
}

#[test]
fn test_integration_end_to_end_recommendations() {
    let dir = TempDir::new().unwrap();
    let settings = settings_in(&dir);

    let profile = pipeline::build_profile(&settings).unwrap();
    assert!((profile.baseline_rating - 7.0).abs() < 1e-12);

    let summary = pipeline::build_exclusions(&settings).unwrap();
    assert_eq!(summary.excluded, 3);
    assert_eq!(summary.owned, 2);

    let report = pipeline::run_recommendations(&settings).unwrap();
    assert_eq!(report.total_candidates, 11);
    assert_eq!(report.unranked, 2);
    assert_eq!(report.out_of_range, 1);
    assert_eq!(report.excluded, 2);
    assert_eq!(report.expansions, 1);
    assert_eq!(report.duplicates, 1);
    assert_eq!(report.returned, 4);

    let records = store::load_records(&settings.paths.output).unwrap().unwrap();
    let ids: Vec<&str> = records.iter().map(|r| r.id.as_str()).collect();
    assert_eq!(ids, vec!["342942", "224517", "266192", "178900"]);
}

#[test]
fn test_owned_and_expansions_never_recommended() {
    let dir = TempDir::new().unwrap();
    let settings = settings_in(&dir);
    let records = run_all(&settings);

    for owned in ["174430", "31260"] {
        assert!(records.iter().all(|r| r.id != owned), "owned game {} recommended", owned);
    }
    for expansion in ["999001", "999002"] {
        assert!(records.iter().all(|r| r.id != expansion), "expansion {} recommended", expansion);
    }
}

#[test]
fn test_collection_attributes_override_estimates() {
    let dir = TempDir::new().unwrap();
    let settings = settings_in(&dir);
    let records = run_all(&settings);

    // Ark Nova is tracked in the collection: its own numbers win
    let ark = records.iter().find(|r| r.id == "342942").unwrap();
    assert_eq!(ark.avgweight, 3.8);
    assert_eq!(ark.playingtime, 150);
    assert_eq!((ark.minplayers, ark.maxplayers), (1, 4));

    // Wingspan: strategy beats family in priority
    let wingspan = records.iter().find(|r| r.id == "266192").unwrap();
    assert_eq!(wingspan.avgweight, 3.2);
    assert_eq!(wingspan.playingtime, 90);

    // Codenames: party estimate
    let codenames = records.iter().find(|r| r.id == "178900").unwrap();
    assert_eq!((codenames.minplayers, codenames.maxplayers), (4, 10));
}

#[test]
fn test_output_schema() {
    let dir = TempDir::new().unwrap();
    let settings = settings_in(&dir);
    run_all(&settings);

    let raw = fs::read_to_string(&settings.paths.output).unwrap();
    let json: serde_json::Value = serde_json::from_str(&raw).unwrap();
    let first = &json.as_array().unwrap()[0];

    assert_eq!(first["rating"], 0.0);
    assert_eq!(first["itemtype"], "boardgame");
    assert_eq!(first["yearpublished"], "2021");
    assert_eq!(first["bggbestplayers"], "");
    assert!(first.get("rank").is_none());
    assert!(first.get("personalizedScore").is_none());
    assert!(first.get("numplays").is_none());
}

#[test]
fn test_limit_truncates_after_ranking() {
    let dir = TempDir::new().unwrap();
    let mut settings = settings_in(&dir);
    settings.pipeline.limit = Some(2);

    let records = run_all(&settings);
    let ids: Vec<&str> = records.iter().map(|r| r.id.as_str()).collect();
    assert_eq!(ids, vec!["342942", "224517"]);
}

#[test]
fn test_rerun_is_deterministic() {
    let dir = TempDir::new().unwrap();
    let settings = settings_in(&dir);

    run_all(&settings);
    let first = fs::read_to_string(&settings.paths.output).unwrap();
    pipeline::run_recommendations(&settings).unwrap();
    let second = fs::read_to_string(&settings.paths.output).unwrap();

    assert_eq!(first, second);
}

#[test]
fn test_id_corrections_rewrite_published_output() {
    let dir = TempDir::new().unwrap();
    let settings = settings_in(&dir);
    run_all(&settings);

    fs::write(
        &settings.paths.corrections,
        "Game Name,Correct ID (fill this in)\n\
         Codenames,178901\n\
         Ark Nova,342942\n\
         Wingspan,\n",
    )
    .unwrap();

    let summary = pipeline::apply_corrections(&settings).unwrap();
    assert_eq!(summary.corrections, 2);
    assert_eq!(summary.updated, 1);

    let records = store::load_records(&settings.paths.output).unwrap().unwrap();
    let ids: Vec<&str> = records.iter().map(|r| r.id.as_str()).collect();
    assert_eq!(ids, vec!["342942", "224517", "266192", "178901"]);
}

#[test]
fn test_wishlist_and_browse() {
    let dir = TempDir::new().unwrap();
    let settings = settings_in(&dir);

    let count = pipeline::build_wishlist(&settings, false).unwrap();
    assert_eq!(count, 1);

    let heavy = BrowseFilter {
        players: Some(2),
        complexity: Some(ComplexityBand::Heavy),
        duration: None,
    };
    let games = pipeline::browse(&settings, &heavy).unwrap();
    assert_eq!(games.len(), 1);
    assert_eq!(games[0].name, "Ark Nova");

    let light = BrowseFilter {
        complexity: Some(ComplexityBand::Light),
        ..BrowseFilter::default()
    };
    assert!(pipeline::browse(&settings, &light).unwrap().is_empty());
}
