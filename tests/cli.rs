//! End-to-end runs of the `intcalc` binary with piped stdin.

use assert_cmd::Command;
use assert_cmd::cargo;
use predicates::prelude::*;

fn run_intcalc(input: &str) -> assert_cmd::assert::Assert {
    Command::new(cargo::cargo_bin!("intcalc"))
        .env_remove("INTCALC_LOG")
        .write_stdin(input)
        .assert()
}

#[test]
fn solves_and_quits() {
    run_intcalc("x**2 + 3*x + 1\nquit\n")
        .success()
        .stdout(predicate::str::contains("INDEFINITE INTEGRAL CALCULATOR"))
        .stdout(predicate::str::contains(
            "∫ (x**2 + 3*x + 1) dx = x**3/3 + 3*x**2/2 + x + C",
        ))
        .stdout(predicate::str::contains(
            "Verified: derivative matches original integrand",
        ))
        .stdout(predicate::str::ends_with(
            "Thank you for using the Indefinite Integral Calculator!\n",
        ));
}

#[test]
fn end_of_input_exits_cleanly() {
    run_intcalc("sin(x)\n")
        .success()
        .stdout(predicate::str::contains("∫ (sin(x)) dx = -cos(x) + C"))
        .stdout(predicate::str::contains(
            "Thank you for using the Indefinite Integral Calculator!",
        ));
}

#[test]
fn example_menu_from_stdin() {
    run_intcalc("examples\n6\nq\n")
        .success()
        .stdout(predicate::str::contains("EXAMPLE PROBLEMS:"))
        .stdout(predicate::str::contains("∫ (1/(x**2 + 1)) dx = atan(x) + C"));
}

#[test]
fn errors_keep_the_loop_running() {
    run_intcalc("foo(x)\nlog(x)\nexit\n")
        .success()
        .stdout(predicate::str::contains("ERROR: Could not solve integral"))
        .stdout(predicate::str::contains("unknown function `foo`"))
        .stdout(predicate::str::contains("∫ (log(x)) dx = x*log(x) - x + C"))
        .stdout(predicate::str::contains("  u = log(x),     dv = dx").not());
}

#[test]
fn logs_stay_off_stdout() {
    Command::new(cargo::cargo_bin!("intcalc"))
        .env("INTCALC_LOG", "intcalc=debug")
        .write_stdin("x*exp(x)\nquit\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("DEBUG").not())
        .stderr(predicate::str::contains("integrating"));
}
