mod distribution_tests;
