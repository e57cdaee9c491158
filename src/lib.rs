pub mod domain {
    pub mod external_apis {
        pub mod github;
    }
    pub mod models {
        pub mod inputs;
        pub mod run;
    }
}

pub mod application {
    pub mod use_cases {
        pub mod report_workflow_runs;
    }
}

pub mod infrastructures {
    pub mod adapters {
        pub mod primary {
            pub mod action;
        }
        pub mod secondary {
            pub mod external_apis {
                pub mod github;
            }
        }
    }
}
