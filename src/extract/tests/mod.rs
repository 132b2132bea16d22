mod detail_tests;
mod page_classifier_tests;
