use assert_cmd::Command;
use predicates::str::contains;

#[test]
fn todo_help_works() {
    Command::cargo_bin("todo")
        .expect("binary")
        .arg("--help")
        .assert()
        .success()
        .stdout(contains("to-do list"));
}

#[test]
fn subcommand_help_works() {
    for cmd in ["add", "list", "toggle", "rm", "ui"] {
        Command::cargo_bin("todo")
            .expect("binary")
            .arg(cmd)
            .arg("--help")
            .assert()
            .success();
    }
}

#[test]
fn add_without_text_is_a_usage_error() {
    Command::cargo_bin("todo")
        .expect("binary")
        .arg("add")
        .assert()
        .failure()
        .code(2);
}
