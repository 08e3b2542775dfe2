mod common;
mod gateway_test;
