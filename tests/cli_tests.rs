#[test]
fn cli_tests() {
	trycmd::TestCases::new()
		.env("NO_COLOR", "1")
		.case("tests/cmd/*.toml")
		.run();
}
