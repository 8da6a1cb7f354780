mod editor_tests;
mod engine_tests;
mod form_tests;
