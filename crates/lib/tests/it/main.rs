/*! Integration tests for Sectioned.
 *
 * This test suite is organized as a single integration test binary
 * following the pattern described by matklad in
 * https://matklad.github.io/2021/02/27/delete-cargo-integration-tests.html
 *
 * The module structure mirrors the main library structure:
 * - controller: Tests for ResultsController fetching, index titles and change notifications
 * - store: Tests for MemoryStore used as a live store, including JSON key paths
 */

use tracing_subscriber::EnvFilter;

#[ctor::ctor]
fn init_test_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::from_default_env().add_directive("sectioned=info".parse().unwrap()),
        )
        .with_test_writer()
        .try_init();
}

mod store;
