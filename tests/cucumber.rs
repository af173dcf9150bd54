use cucumber::{given, then, when, World};
use std::path::PathBuf;

use scenario_ref_core::{
    match_across_environments, search, validate_references, Environment, EnvironmentStore,
    FileSnapshotSource, IndexSet, MatchResult, ParsedReference, ReferenceParser, SearchOutcome,
    ValidationReport,
};

#[derive(Debug, Default, World)]
pub struct TestWorld {
    store: EnvironmentStore,
    text: String,
    references: Vec<ParsedReference>,
    validation: Option<ValidationReport>,
    search_outcome: Option<SearchOutcome>,
    match_result: Option<MatchResult>,
}

fn fixtures_path() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests").join("fixtures")
}

fn env(name: &str) -> Environment {
    name.parse().expect("Invalid environment name")
}

fn current_match(world: &TestWorld) -> &MatchResult {
    match (&world.search_outcome, &world.match_result) {
        (Some(SearchOutcome::Identifier(result)), _) => result,
        (_, Some(result)) => result,
        _ => panic!("No match result"),
    }
}

// ============== Input Steps ==============

#[given(expr = "the reference text fixture {string}")]
fn load_reference_text(world: &mut TestWorld, name: String) {
    let path = fixtures_path().join(name);
    world.text = std::fs::read_to_string(&path).expect("Failed to read reference fixture");
}

#[given(expr = "the reference line {string}")]
fn set_reference_line(world: &mut TestWorld, line: String) {
    world.text = line;
}

#[given(expr = "the {string} snapshot fixture {string}")]
fn load_snapshot(world: &mut TestWorld, env_name: String, name: String) {
    let env = env(&env_name);
    let source = FileSnapshotSource::default()
        .with_path(env, fixtures_path().join("snapshots").join(name));
    world.store.ensure_loaded(env, &source);
}

// ============== Parsing Steps ==============

#[when("I parse the reference text")]
fn parse_text(world: &mut TestWorld) {
    world.references = ReferenceParser::new().parse(&world.text);
}

#[then(expr = "{int} references should be found")]
fn references_found(world: &mut TestWorld, count: usize) {
    assert_eq!(world.references.len(), count, "Found: {:?}", world.references);
}

#[then("the references should be:")]
fn references_should_be(world: &mut TestWorld, step: &cucumber::gherkin::Step) {
    let table = step.table.as_ref().expect("No table");
    let expected: Vec<(usize, &str, &str)> = table
        .rows
        .iter()
        .skip(1)
        .map(|row| {
            (
                row[0].parse().expect("Invalid line number"),
                row[1].as_str(),
                row[2].as_str(),
            )
        })
        .collect();
    let actual: Vec<(usize, &str, &str)> = world
        .references
        .iter()
        .map(|r| (r.source_line, r.path.as_str(), r.identifier.as_str()))
        .collect();
    assert_eq!(actual, expected);
}

#[then("parsing twice should give identical references")]
fn parse_twice(world: &mut TestWorld) {
    let parser = ReferenceParser::new();
    let first = parser.parse(&world.text);
    let second = parser.parse(&world.text);
    assert!(!first.is_empty());
    assert_eq!(first, second);
}

// ============== Validation Steps ==============

#[when(expr = "I validate the references against {string}")]
fn validate(world: &mut TestWorld, env_name: String) {
    let env = env(&env_name);
    let references = ReferenceParser::new().parse(&world.text);
    let indexes = IndexSet::from_store(&world.store);
    let index = indexes.get(env).expect("Environment not loaded");
    world.validation = Some(validate_references(&references, index, env));
}

#[then(expr = "{int} references should be valid and {int} invalid")]
fn valid_and_invalid(world: &mut TestWorld, valid: usize, invalid: usize) {
    let report = world.validation.as_ref().expect("No validation report");
    assert_eq!(report.valid_count, valid);
    assert_eq!(report.invalid_count, invalid);
}

#[then(expr = "the reference on line {int} should resolve to scenario {string} block {string}")]
fn line_resolves(world: &mut TestWorld, line: usize, scenario: String, block: String) {
    let report = world.validation.as_ref().expect("No validation report");
    let result = report
        .results
        .iter()
        .find(|r| r.source_line == line)
        .expect("No result for line");
    assert!(result.valid);
    assert_eq!(result.resolved_collection_name.as_deref(), Some(scenario.as_str()));
    assert_eq!(result.resolved_item_name.as_deref(), Some(block.as_str()));
}

#[then(expr = "the reference on line {int} should be invalid")]
fn line_invalid(world: &mut TestWorld, line: usize) {
    let report = world.validation.as_ref().expect("No validation report");
    let result = report
        .results
        .iter()
        .find(|r| r.source_line == line)
        .expect("No result for line");
    assert!(!result.valid);
    assert!(result.resolved_item_name.is_none());
}

#[then(expr = "the {string} environment should not be loaded")]
fn env_not_loaded(world: &mut TestWorld, env_name: String) {
    assert!(!world.store.is_loaded(env(&env_name)));
}

#[then(expr = "the {string} environment should be loaded")]
fn env_loaded(world: &mut TestWorld, env_name: String) {
    assert!(world.store.is_loaded(env(&env_name)));
}

// ============== Search Steps ==============

#[when(expr = "I search for {string}")]
fn search_for(world: &mut TestWorld, term: String) {
    let indexes = IndexSet::from_store(&world.store);
    world.search_outcome = Some(search(&term, &indexes));
}

#[when(expr = "I match block {string} from {string}")]
fn match_block(world: &mut TestWorld, id: String, env_name: String) {
    let indexes = IndexSet::from_store(&world.store);
    world.match_result = Some(match_across_environments(&id, env(&env_name), &indexes));
}

#[then("the search should be in identifier mode")]
fn identifier_mode(world: &mut TestWorld) {
    assert!(matches!(world.search_outcome, Some(SearchOutcome::Identifier(_))));
}

#[then("the search should be in name mode")]
fn name_mode(world: &mut TestWorld) {
    assert!(matches!(world.search_outcome, Some(SearchOutcome::Name(_))));
}

#[then(expr = "{string} should have block {string}")]
fn env_has_block(world: &mut TestWorld, env_name: String, block_id: String) {
    let result = current_match(world);
    let matched = result.get(env(&env_name)).expect("Block not found in environment");
    assert_eq!(matched.item_id, block_id);
}

#[then(expr = "{string} should have no block")]
fn env_has_no_block(world: &mut TestWorld, env_name: String) {
    assert!(current_match(world).get(env(&env_name)).is_none());
}

#[then("no environment should have the block")]
fn no_env_has_block(world: &mut TestWorld) {
    assert_eq!(current_match(world).found_count(), 0);
}

#[then(expr = "the search should have {int} hits")]
fn search_hits(world: &mut TestWorld, hits: usize) {
    match &world.search_outcome {
        Some(SearchOutcome::Name(result)) => assert_eq!(result.total_hits, hits),
        other => panic!("Expected name search, got {:?}", other),
    }
}

#[then("the comparison rows should be:")]
fn comparison_rows(world: &mut TestWorld, step: &cucumber::gherkin::Step) {
    let result = match &world.search_outcome {
        Some(SearchOutcome::Name(result)) => result,
        other => panic!("Expected name search, got {:?}", other),
    };
    let table = step.table.as_ref().expect("No table");
    let rows: Vec<&Vec<String>> = table.rows.iter().skip(1).collect();
    assert_eq!(result.rows.len(), rows.len());

    for (actual, expected) in result.rows.iter().zip(rows) {
        assert_eq!(actual.collection_name, expected[0]);
        assert_eq!(actual.item_name, expected[1]);
        for (column, env) in Environment::ALL.into_iter().enumerate() {
            let id = actual
                .environments
                .get(&env)
                .and_then(Option::as_ref)
                .map(|ids| ids.item_id.as_str())
                .unwrap_or("none");
            assert_eq!(id, expected[column + 2], "{} column of {}", env, actual.item_name);
        }
    }
}

#[tokio::main]
async fn main() {
    TestWorld::run("tests/features").await;
}
