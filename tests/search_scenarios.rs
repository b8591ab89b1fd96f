//! End-to-end search scenarios driven through the public orchestrator API.

use clubfind::catalog::{FetchOutcome, LoadState, SearchOrchestrator};
use clubfind::error::FetchError;
use clubfind::index::{Club, SearchIndex};
use clubfind::query::{parse_query, FilterSelection};

fn directory() -> Vec<Club> {
    vec![
        Club::new("1", "Chess Club")
            .with_aliases(["CC"])
            .with_followers(10)
            .with_schools(["COLLEGE"])
            .with_categories(["Games"]),
        Club::new("2", "Computer Club")
            .with_followers(50)
            .with_schools(["COLLEGE", "ENGINEERING"])
            .with_categories(["Technology"]),
        Club::new("3", "Alpha Beta Gamma")
            .with_aliases(["ABG"])
            .with_followers(30)
            .with_schools(["BUSINESS"])
            .with_affiliations(["Greek Life"]),
        Club::new("4", "Débate Society")
            .with_followers(30)
            .with_schools(["COLLEGE"])
            .with_categories(["Academic"]),
    ]
}

fn loaded(clubs: Vec<Club>) -> SearchOrchestrator {
    let mut orchestrator = SearchOrchestrator::new();
    let ticket = orchestrator.begin_fetch(1);
    orchestrator.complete_fetch(ticket, Ok(clubs));
    orchestrator
}

fn names(orchestrator: &SearchOrchestrator) -> Vec<String> {
    orchestrator.results().iter().map(|c| c.name.clone()).collect()
}

#[test]
fn prefix_on_every_word_ranks_by_followers() {
    let mut orchestrator = loaded(directory());
    orchestrator.set_query("c club");
    assert_eq!(names(&orchestrator), vec!["Computer Club", "Chess Club"]);
}

#[test]
fn alias_resolves_to_canonical_club() {
    let mut orchestrator = loaded(directory());
    orchestrator.set_query("cc");
    assert_eq!(names(&orchestrator), vec!["Chess Club"]);
}

#[test]
fn second_word_prefix_matches() {
    let mut orchestrator = loaded(directory());
    orchestrator.set_query("gam");
    assert_eq!(names(&orchestrator), vec!["Alpha Beta Gamma"]);
}

#[test]
fn query_is_case_insensitive() {
    let mut orchestrator = loaded(directory());
    orchestrator.set_query("CHESS");
    assert_eq!(names(&orchestrator), vec!["Chess Club"]);
}

#[test]
fn empty_query_returns_every_club_ranked() {
    let orchestrator = loaded(directory());
    assert_eq!(
        names(&orchestrator),
        vec!["Computer Club", "Alpha Beta Gamma", "Débate Society", "Chess Club"]
    );
}

#[test]
fn unmatched_word_empties_results() {
    let mut orchestrator = loaded(directory());
    orchestrator.set_query("chess zebra");
    assert!(orchestrator.results().is_empty());
}

#[test]
fn school_without_clubs_is_empty_not_an_error() {
    let mut orchestrator = loaded(directory());
    orchestrator.set_schools(["LAW"]);
    assert!(orchestrator.results().is_empty());
    let status = orchestrator.status();
    assert_eq!(status.state, LoadState::Ready);
    assert!(status.last_error.is_none());
}

#[test]
fn follow_only_with_nothing_followed_is_empty() {
    let mut orchestrator = loaded(directory());
    orchestrator.set_follow_only(true);
    assert!(orchestrator.results().is_empty());
}

#[test]
fn facets_combine_with_and() {
    let mut orchestrator = loaded(directory());
    orchestrator.set_schools(["COLLEGE", "BUSINESS"]);
    orchestrator.set_categories(["Games", "Greek Life"]);
    assert_eq!(names(&orchestrator), vec!["Alpha Beta Gamma", "Chess Club"]);

    orchestrator.set_query("a");
    assert_eq!(names(&orchestrator), vec!["Alpha Beta Gamma"]);
}

#[test]
fn inline_filters_merge_into_selection() {
    let mut orchestrator = loaded(directory());
    let mut selection = FilterSelection::default();
    selection.merge_parsed(parse_query("club school:ENGINEERING"));
    orchestrator.set_selection(selection);
    assert_eq!(names(&orchestrator), vec!["Computer Club"]);
}

#[test]
fn accented_names_sort_with_their_base_letters() {
    let orchestrator = loaded(vec![
        Club::new("1", "Eagle Scouts").with_followers(5),
        Club::new("2", "Émigré Circle").with_followers(5),
        Club::new("3", "Dance Team").with_followers(5),
    ]);
    assert_eq!(
        names(&orchestrator),
        vec!["Dance Team", "Eagle Scouts", "Émigré Circle"]
    );
}

#[test]
fn pages_accumulate_and_refresh_duplicates() {
    let mut all = directory();
    let second = all.split_off(2);

    let mut orchestrator = loaded(all);
    let ticket = orchestrator.begin_fetch(2);
    let mut refreshed = second.clone();
    refreshed.push(Club::new("1", "Chess Club").with_aliases(["CC"]).with_followers(80));
    let outcome = orchestrator.complete_fetch(ticket, Ok(refreshed));

    assert_eq!(
        outcome,
        FetchOutcome::Applied {
            page: 2,
            added: 2,
            total: 4
        }
    );
    assert_eq!(names(&orchestrator)[0], "Chess Club");
    assert_eq!(orchestrator.results().len(), 4);
}

#[test]
fn failed_page_keeps_previous_results() {
    let mut orchestrator = loaded(directory());
    orchestrator.set_query("c club");
    let before = names(&orchestrator);

    let ticket = orchestrator.begin_fetch(2);
    let outcome = orchestrator.complete_fetch(
        ticket,
        Err(FetchError::Unavailable {
            page: 2,
            message: "503".to_string(),
        }),
    );

    assert!(matches!(outcome, FetchOutcome::Failed(_)));
    assert_eq!(names(&orchestrator), before);
    assert_eq!(orchestrator.status().last_error.map(|e| e.page()), Some(2));
}

#[test]
fn refetching_page_one_replaces_collection() {
    let mut orchestrator = loaded(directory());
    let ticket = orchestrator.begin_fetch(1);
    orchestrator.complete_fetch(ticket, Ok(vec![Club::new("9", "Rowing Crew")]));

    assert_eq!(names(&orchestrator), vec!["Rowing Crew"]);
    orchestrator.set_query("chess");
    assert!(orchestrator.results().is_empty());
}

#[test]
fn index_stats_report_shared_aliases() {
    let clubs = vec![
        Club::new("1", "Chess Club").with_aliases(["CC"]),
        Club::new("2", "Cycling Club").with_aliases(["CC"]),
    ];
    let stats = SearchIndex::build(&clubs, 1).stats();
    assert_eq!(stats.clubs, 2);
    assert_eq!(stats.ambiguous_keys.len(), 1);
    assert_eq!(stats.ambiguous_keys[0].0, "cc");
}

#[test]
fn shared_alias_matches_both_clubs() {
    let mut orchestrator = loaded(vec![
        Club::new("1", "Chess Club").with_aliases(["CC"]).with_followers(1),
        Club::new("2", "Cycling Club").with_aliases(["CC"]).with_followers(2),
    ]);
    orchestrator.set_query("cc");
    assert_eq!(names(&orchestrator), vec!["Cycling Club", "Chess Club"]);
}
