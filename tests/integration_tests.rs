// Integration tests for Pulse

mod integration {
    mod support;

    mod config_output_test;
    mod graph_test;
    mod scan_test;
    mod scoring_test;
    mod watch_test;
}
