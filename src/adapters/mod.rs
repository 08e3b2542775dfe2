pub mod strata_client;
