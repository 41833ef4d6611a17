use std::{
    cell::RefCell,
    fs::{self},
    rc::Rc,
};

use statcore::{
    Evaluation, evaluate,
    interpreter::{
        connection::{NativeCall, TextConnection},
        evaluator::{core::Context, options::Options},
        value::Value,
    },
};
use walkdir::WalkDir;

#[test]
fn script_examples_work() {
    let mut count = 0;

    for entry in WalkDir::new("scripts").into_iter()
                                        .filter_map(Result::ok)
                                        .filter(|e| e.path().extension().is_some_and(|ext| ext == "R"))
    {
        let path = entry.path();
        let content = fs::read_to_string(path).unwrap_or_else(|e| panic!("Failed to read {path:?}: {e}"));
        count += 1;
        match evaluate(&content) {
            Ok(evaluation) => assert!(evaluation.warnings.is_empty(),
                                      "Script {path:?} raised warnings: {:?}",
                                      evaluation.warnings),
            Err(e) => panic!("Script {path:?} failed:\nError: {e}"),
        }
    }

    assert!(count > 0, "No scripts found in scripts/");
}

#[test]
fn example_script_works() {
    let content = fs::read_to_string("tests/example.R").expect("Failed to read tests/example.R");
    assert_success(&content);
}

fn assert_success(src: &str) -> Evaluation {
    match evaluate(src) {
        Ok(evaluation) => evaluation,
        Err(e) => panic!("Script failed: {e}"),
    }
}

fn assert_failure(src: &str, id: &str) {
    match evaluate(src) {
        Ok(evaluation) => panic!("Script succeeded but was expected to fail: {:?}", evaluation.value),
        Err(e) => assert_eq!(e.id(), id, "unexpected error: {e}"),
    }
}

fn warning_ids(src: &str) -> Vec<&'static str> {
    assert_success(src).warnings.iter().map(|w| w.id()).collect()
}

fn printed(src: &str) -> Vec<String> {
    let out = Rc::new(RefCell::new(TextConnection::new(Vec::new())));
    let mut ctx = Context::with_stdout(out.clone());
    if let Err(e) = ctx.run(src) {
        panic!("Script failed: {e}");
    }
    out.borrow().output()
}

#[test]
fn assignment_and_basic_arithmetic() {
    assert_success("x <- 1 + 2\nstopifnot(x == 3)");
    assert_success("x = 7 * 9\nstopifnot(x == 63)");
    assert_success("8 - 5 -> x\nstopifnot(x == 3)");
    assert_success("x <- 10 / 4\nstopifnot(x == 2.5)");
    assert_success("stopifnot(2 ^ 10 == 1024, 7 %% 3 == 1, 7 %/% 2 == 3, (-7) %% 3 == 2)");
}

#[test]
fn integer_arithmetic_keeps_its_kind() {
    assert_success("stopifnot(identical(1L + 2L, 3L))");
    assert_success("stopifnot(identical(typeof(1L * 2L), \"integer\"))");
    assert_success("stopifnot(identical(typeof(1L / 2L), \"double\"))");
    assert_success("stopifnot(identical(typeof(TRUE + TRUE), \"integer\"))");
}

#[test]
fn integer_overflow_warns_and_gives_na() {
    let evaluation = assert_success("x <- 2147483647L + 1L\nstopifnot(is.na(x))\nx");
    assert_eq!(evaluation.warnings.len(), 1);
    assert_eq!(evaluation.warnings[0].id(), "INTEGER_OVERFLOW");
}

#[test]
fn recycling_and_length_warnings() {
    assert_success("stopifnot(identical(1:4 + 1:2, c(2L, 4L, 4L, 6L)))");
    assert_eq!(warning_ids("1:3 + 1:2"), vec!["LENGTH_NOT_MULTI"]);
    assert_success("stopifnot(identical(1:3 + integer(0), integer(0)))");
}

#[test]
fn na_propagates_through_arithmetic() {
    assert_success("stopifnot(is.na(NA + 1), is.na(NA_integer_ * 2L), is.na(NA_real_ - 1))");
    assert_success("stopifnot(identical(is.na(c(1, NA, NaN)), c(FALSE, TRUE, TRUE)))");
}

#[test]
fn comparison_and_logic() {
    assert_success("stopifnot(identical(c(1, 2, 3) > 2, c(FALSE, FALSE, TRUE)))");
    assert_success("stopifnot(\"abc\" < \"abd\", \"B\" < \"a\")");
    assert_success("stopifnot(identical(c(TRUE, NA) & FALSE, c(FALSE, FALSE)))");
    assert_success("stopifnot(identical(c(TRUE, NA) | TRUE, c(TRUE, TRUE)))");
    assert_success("stopifnot(is.na(NA & TRUE))");
    assert_success("stopifnot(identical(!c(TRUE, FALSE), c(FALSE, TRUE)))");
}

#[test]
fn short_circuit_skips_right_operand() {
    assert_success("stopifnot(FALSE && stop(\"never\") == FALSE || TRUE)");
    assert_success("stopifnot(TRUE || stop(\"never\"))");
    assert_failure("c(TRUE, FALSE) && TRUE", "INVALID_ARGUMENT");
}

#[test]
fn coercion_through_c() {
    assert_success("stopifnot(identical(typeof(c(1L, 2.5)), \"double\"))");
    assert_success("stopifnot(identical(c(1, \"a\"), c(\"1\", \"a\")))");
    assert_success("stopifnot(identical(typeof(c(1, list(2))), \"list\"))");
    assert_success("stopifnot(is.null(c()))");
    assert_success("stopifnot(identical(c(TRUE, NA, 2L), c(1L, NA, 2L)))");
}

#[test]
fn as_functions_warn_once() {
    let evaluation = assert_success("as.integer(c(\"1\", \"x\", \"y\"))");
    assert_eq!(evaluation.warnings.len(), 1);
    assert_eq!(evaluation.warnings[0].id(), "NA_INTRODUCED_COERCION");
    assert_eq!(warning_ids("as.integer(3e10)"), vec!["NA_INTRODUCED_COERCION_INT"]);
    assert_eq!(warning_ids("as.raw(300)"), vec!["OUT_OF_RANGE"]);
    assert_success("stopifnot(identical(as.logical(c(\"T\", \"false\", \"yes\")), c(TRUE, FALSE, NA)))");
    assert_success("stopifnot(identical(as.logical(c(\"1\", \"0\", \"TRUE\", \"F\")), c(TRUE, FALSE, TRUE, FALSE)))");
    assert_success("stopifnot(identical(as.character(1.5), \"1.5\"))");
}

#[test]
fn sum_and_friends() {
    let evaluation = assert_success("sum(c(1, NA, 3), na.rm = TRUE)");
    assert_eq!(format!("{:?}", evaluation.value), "4");
    assert!(evaluation.warnings.is_empty());

    assert_success("stopifnot(is.na(sum(c(NA))))");
    assert_success("stopifnot(identical(sum(1:10), 55L))");
    assert_success("stopifnot(identical(sum(), 0L))");
    assert_success("stopifnot(identical(prod(1:5), 120))");
    assert_success("stopifnot(min(3, 1, 2) == 1, max(c(4, 9), 2) == 9)");
    assert_success("stopifnot(identical(max(\"apple\", \"pear\"), \"pear\"))");
}

#[test]
fn empty_extremes_warn() {
    let evaluation = assert_success("max(character(0))");
    assert_eq!(format!("{:?}", evaluation.value), "NA");
    assert_eq!(evaluation.warnings[0].id(), "NO_NONMISSING_CHARACTER");

    let evaluation = assert_success("min(numeric(0))");
    assert_eq!(format!("{:?}", evaluation.value), "Inf");
    assert_eq!(evaluation.warnings[0].id(), "NO_NONMISSING_MIN");
}

#[test]
fn integer_sum_overflow_warns() {
    let evaluation = assert_success("sum(2147483647L, 1L)");
    assert_eq!(format!("{:?}", evaluation.value), "NA");
    assert_eq!(evaluation.warnings[0].id(), "INTEGER_OVERFLOW_USE_SUM_NUMERIC");
}

#[test]
fn reductions_reject_wrong_types() {
    assert_failure("sum(\"a\")", "INVALID_TYPE_ARGUMENT");
    assert_failure("max(list(1))", "INVALID_TYPE_ARGUMENT");
}

#[test]
fn sequences_behave_like_dense_vectors() {
    assert_success("stopifnot(identical(1:3, c(1L, 2L, 3L)))");
    assert_success("stopifnot(identical(5:3, c(5L, 4L, 3L)))");
    assert_success("stopifnot(sum(1:100) == sum(c(1:50, 51:100)))");
    assert_success("stopifnot(identical(seq_len(3), 1:3), length(seq_len(0)) == 0)");
    assert_success("stopifnot(identical(1.5:3, c(1.5, 2.5)))");
}

#[test]
fn indexing() {
    assert_success("x <- c(10, 20, 30)\nstopifnot(x[2] == 20, identical(x[-1], c(20, 30)))");
    assert_success("x <- c(10, 20, 30)\nstopifnot(identical(x[c(TRUE, FALSE)], c(10, 30)))");
    assert_success("x <- c(a = 1, b = 2)\nstopifnot(x[[\"b\"]] == 2, is.na(x[\"z\"]))");
    assert_success("x <- 1:3\nstopifnot(is.na(x[5]), length(x[0]) == 0)");
    assert_success("l <- list(a = 1, b = \"s\")\nstopifnot(identical(l$b, \"s\"), is.null(l$z))");
    assert_success("l <- list(alpha = 1)\nstopifnot(l$al == 1, is.null(l[[\"al\"]]))");
    assert_failure("x <- 1:3\nx[[5]]", "SUBSCRIPT_BOUNDS");
    assert_failure("x <- 1:3\nx[c(-1, 2)]", "INVALID_ARGUMENT");
}

#[test]
fn matrix_indexing() {
    assert_success("m <- 1:6\ndim(m) <- c(2, 3)\nstopifnot(m[2, 3] == 6, identical(m[1, ], c(1L, 3L, 5L)))");
    assert_success("m <- 1:6\ndim(m) <- c(2, 3)\nstopifnot(identical(dim(m[1, , drop = FALSE]), c(1L, 3L)))");
    assert_failure("m <- 1:6\ndim(m) <- c(2, 3)\nm[1, , drop = FALSE, drop = TRUE]", "INCORRECT_DIMENSIONS");
    assert_failure("m <- 1:6\ndim(m) <- c(4, 2)", "INCORRECT_DIMENSIONS");
}

#[test]
fn replacement_on_a_variable() {
    assert_success("x <- 1:3\nnames(x) <- c(\"a\", \"b\", \"c\")\nstopifnot(identical(names(x), c(\"a\", \"b\", \"c\")))");
    assert_success("x <- c(1, 2)\nx[5] <- 9\nstopifnot(length(x) == 5, is.na(x[3]), x[5] == 9)");
    assert_success("x <- c(a = 1)\nx[\"b\"] <- 2\nstopifnot(identical(names(x), c(\"a\", \"b\")))");
    assert_success("x <- 1:3\nx[2] <- 2.5\nstopifnot(identical(x, c(1, 2.5, 3)))");
    assert_eq!(warning_ids("x <- 1:5\nx[1:3] <- 1:2"), vec!["NOT_MULTIPLE_REPLACEMENT"]);
}

#[test]
fn replacement_leaves_no_hidden_slots() {
    assert_failure("x <- 1:3\nx[1] <- 0L\n`*tmp*`", "UNKNOWN_OBJECT");
    assert_failure("x <- 1:3\nx[1] <- 0L\n`*rhs*1`", "UNKNOWN_OBJECT");
}

#[test]
fn replacement_value_is_the_right_hand_side() {
    let evaluation = assert_success("x <- 1:3\ny <- (x[2] <- 10L)\ny");
    assert_eq!(format!("{:?}", evaluation.value), "10L");
}

#[test]
fn replacement_through_nested_index() {
    assert_success("x <- list(a = 1:3)\nx$a[2] <- 20L\nstopifnot(identical(x$a, c(1L, 20L, 3L)))");
    assert_success("x <- list(list(1, 2))\nx[[1]][[2]] <- \"b\"\nstopifnot(identical(x[[1]][[2]], \"b\"))");
    assert_success("x <- c(1, 2)\nnames(x)[2] <- \"second\"\nstopifnot(identical(names(x), c(NA, \"second\")))");
}

#[test]
fn replacement_through_fields_and_slots() {
    assert_success("x <- list()\nx$a <- 1\nx$b <- \"two\"\nstopifnot(length(x) == 2, x$a == 1)");
    assert_success("x <- list(a = 1, b = 2)\nx$a <- NULL\nstopifnot(identical(names(x), \"b\"))");
    assert_success("x <- 1\nx@label <- \"one\"\nstopifnot(identical(x@label, \"one\"))");
    assert_eq!(warning_ids("x <- 1:2\nx$a <- 3"), vec!["COERCING_LHS_TO_LIST"]);
}

#[test]
fn attribute_writes_check_the_shape() {
    assert_failure("x <- 1:3\nattr(x, \"dim\") <- c(5L, 5L)", "INCORRECT_DIMENSIONS");
    assert_failure("x <- 1:3\nx@dim <- c(5L, 5L)", "INCORRECT_DIMENSIONS");
    assert_failure("x <- 1:3\nattr(x, \"names\") <- c(\"a\", \"b\", \"c\", \"d\")", "INVALID_ARGUMENT");
    assert_failure("x <- 1:3\nattr(x, \"dimnames\") <- list(\"a\")", "INVALID_ARGUMENT");
    assert_failure("m <- 1:4\ndim(m) <- c(2L, 2L)\nattr(m, \"dimnames\") <- list(\"a\", NULL)",
                   "INVALID_ARGUMENT");
    assert_success("m <- 1:4\n\
                    attr(m, \"dim\") <- c(2L, 2L)\n\
                    attr(m, \"dimnames\") <- list(c(\"a\", \"b\"), NULL)\n\
                    x <- 1:2\n\
                    attr(x, \"names\") <- \"first\"\n\
                    stopifnot(m[2, 2] == 4, identical(names(x), c(\"first\", NA)))");
}

#[test]
fn missing_slots_name_the_class_or_type() {
    let untyped = evaluate("x <- 1\nx@label").expect_err("slot access succeeded");
    assert_eq!(untyped.id(), "INVALID_ARGUMENT");
    assert!(untyped.to_string().contains("from an object of type \"double\""), "{untyped}");

    let classed = evaluate("x <- 1\nattr(x, \"class\") <- \"point\"\nx@label").expect_err("slot access succeeded");
    assert!(classed.to_string().contains("for this object of class \"point\""), "{classed}");
}

#[test]
fn replacement_through_a_call_receiver() {
    assert_success("`second<-` <- function(x, value) { x[2] <- value; x }\n\
                    x <- c(1, 2, 3)\n\
                    second(x) <- 20\n\
                    stopifnot(identical(x, c(1, 20, 3)))");
    assert_success("x <- list(v = 1:3)\n\
                    names(x$v) <- c(\"a\", \"b\", \"c\")\n\
                    stopifnot(identical(names(x$v), c(\"a\", \"b\", \"c\")))");
    assert_success("x <- 1:4\n\
                    dim(x) <- c(2, 2)\n\
                    attr(x, \"note\") <- \"square\"\n\
                    stopifnot(identical(attr(x, \"note\"), \"square\"), identical(dim(x), c(2L, 2L)))");
}

#[test]
fn superassignment_updates_enclosing_binding() {
    assert_success("x <- c(1, 2)\nf <- function() x[1] <<- 5\nf()\nstopifnot(identical(x, c(5, 2)))");
    assert_success("count <- 0\nbump <- function() count <<- count + 1\nbump()\nbump()\nstopifnot(count == 2)");
}

#[test]
fn invalid_assignment_targets() {
    assert_failure("1 <- 2", "INVALID_LHS");
    assert_failure("f()[1] <- 2", "UNSUPPORTED_RECEIVER_SHAPE");
}

#[test]
fn closures_and_arguments() {
    assert_success("f <- function(a, b = 2) a * b\nstopifnot(f(3) == 6, f(3, 4) == 12, f(b = 1, 5) == 5)");
    assert_success("f <- function(value, verbose = FALSE) value\nstopifnot(f(val = 3) == 3)");
    assert_success("f <- function(a, b = a + 1) b\nstopifnot(f(1) == 2)");
    assert_success("make <- function(n) function(x) x + n\nadd2 <- make(2)\nstopifnot(add2(5) == 7)");
    assert_success("f <- function(a, b = 2, ...) list(a, b, ...)\n\
                    r <- f(b = 5, 10, 20)\n\
                    stopifnot(r[[1]] == 10, r[[2]] == 5, r[[3]] == 20, length(r) == 3)");
    assert_success("g <- function(...) sum(...)\nstopifnot(g(1, 2, 3) == 6)");
    assert_success("f <- function(x) { if (x > 0) return(\"pos\"); \"neg\" }\nstopifnot(f(1) == \"pos\", f(-1) == \"neg\")");
}

#[test]
fn argument_matching_errors() {
    assert_failure("f <- function(a) a\nf(1, 2)", "UNUSED_ARGUMENT");
    assert_failure("f <- function(a) a\nf(1, 2, 3)", "UNUSED_ARGUMENTS");
    assert_failure("f <- function(a) a\nf(a = 1, a = 2)", "FORMAL_MATCHED_MULTIPLE");
    assert_failure("f <- function(alpha, alpine) 1\nf(al = 1)", "ARGUMENT_MATCHES_MULTIPLE");
    assert_failure("f <- function(a) a\nf()", "ARGUMENT_MISSING");
}

#[test]
fn partial_matching_can_be_disabled() {
    assert_failure("options(partial.matching = FALSE)\nf <- function(value) value\nf(val = 1)",
                   "UNUSED_ARGUMENT");
}

#[test]
fn call_sites_beyond_the_cache_stay_correct() {
    assert_success("f <- function(a = 0, b = 0, c = 0, d = 0, e = 0) a + 2 * b + 3 * c + 4 * d + 5 * e\n\
                    g <- function(...) f(...)\n\
                    stopifnot(g(a = 1) == 1, g(b = 1) == 2, g(c = 1) == 3, g(d = 1) == 4)\n\
                    stopifnot(g(e = 1) == 5, g(a = 1) == 1, g(1, 1) == 3, g(b = 1) == 2)");
    assert_success("calls <- list(list(a = 1), list(b = 1), list(a = 1, 2))\n\
                    f <- function(a = 0, b = 0) a - b\n\
                    total <- 0\n\
                    for (args in calls) total <- total + do.call(f, args)\n\
                    stopifnot(total == -1)");
    assert_success("options(argument.cache.size = 0)\nf <- function(a, b) a - b\nstopifnot(f(b = 1, 3) == 2, f(3, 1) == 2)");
}

#[test]
fn control_flow() {
    assert_success("x <- 0\nfor (i in 1:10) x <- x + i\nstopifnot(x == 55)");
    assert_success("i <- 0\nwhile (i < 5) i <- i + 1\nstopifnot(i == 5)");
    assert_success("i <- 0\nrepeat { i <- i + 1; if (i >= 3) break }\nstopifnot(i == 3)");
    assert_success("s <- 0\nfor (i in 1:6) { if (i %% 2 == 0) next; s <- s + i }\nstopifnot(s == 9)");
    assert_success("x <- if (FALSE) 1 else 2\nstopifnot(x == 2)");
    assert_success("x <- if (FALSE) 1\nstopifnot(is.null(x))");
    assert_success("f <- function(x) {\n  if (x)\n    1\n  else\n    2\n}\nstopifnot(f(FALSE) == 2)");
}

#[test]
fn invalid_conditions() {
    assert_failure("if (NA) 1", "INVALID_CONDITION");
    assert_failure("if (logical(0)) 1", "INVALID_CONDITION");
    assert_failure("if (c(TRUE, FALSE)) 1", "INVALID_CONDITION");
    assert_failure("if (\"maybe\") 1", "INVALID_CONDITION");
    assert_success("if (\"true\") x <- 1\nstopifnot(x == 1)");
}

#[test]
fn break_outside_a_loop_fails() {
    assert_failure("break", "NO_LOOP_FOR_BREAK_NEXT");
}

#[test]
fn apply_helpers() {
    assert_success("r <- lapply(list(a = 1, b = 2), function(v) v * 10)\n\
                    stopifnot(identical(names(r), c(\"a\", \"b\")), r$b == 20)");
    assert_success("stopifnot(do.call(\"sum\", list(1, 2, 3)) == 6)");
    assert_success("stopifnot(do.call(function(a, b) a - b, list(b = 1, a = 3)) == 2)");
    assert_failure("do.call(\"sum\", 1)", "INVALID_ARGUMENT");
}

#[test]
fn attributes_and_types() {
    assert_success("stopifnot(identical(typeof(1), \"double\"), identical(typeof(\"a\"), \"character\"))");
    assert_success("stopifnot(identical(typeof(NULL), \"NULL\"), identical(typeof(list()), \"list\"))");
    assert_success("stopifnot(identical(typeof(1i), \"complex\"), identical(typeof(as.raw(1)), \"raw\"))");
    assert_success("stopifnot(length(NULL) == 0, length(list(1, 2)) == 2)");
    assert_success("x <- c(a = 1, b = 2)\nnames(x) <- NULL\nstopifnot(is.null(names(x)))");
    assert_failure("x <- 1:2\nnames(x) <- c(\"a\", \"b\", \"c\")", "INVALID_ARGUMENT");
}

#[test]
fn conditions() {
    assert_failure("stopifnot(TRUE, 1 == 2)", "ASSERTION_FAILED");
    assert_failure("stop(\"custom failure\")", "GENERIC");
    assert_eq!(warning_ids("warning(\"careful\")"), vec!["USER"]);
}

#[test]
fn warning_levels() {
    assert!(warning_ids("options(warn = -1)\nas.integer(\"x\")").is_empty());
    assert_failure("options(warn = 2)\nas.integer(\"x\")", "WARNING_AS_ERROR");
    assert_success("old <- options(warn = 1)\nstopifnot(old$warn == 0)");
    assert_failure("options(nonsense = 1)", "INVALID_ARGUMENT");
}

#[test]
fn unknown_names() {
    assert_failure("y <- x + 1", "UNKNOWN_OBJECT");
    assert_failure("nothing(1)", "UNKNOWN_FUNCTION");
    assert_failure("x <- 1\nx(2)", "UNKNOWN_FUNCTION");
}

#[test]
fn recursion_limit() {
    assert_success("options(expressions = 50)\nf <- function(n) if (n == 0) 0 else 1 + f(n - 1)\nstopifnot(f(40) == 40)");
    assert_failure("options(expressions = 50)\nf <- function(n) f(n + 1)\nf(1)", "NESTING_TOO_DEEP");
}

#[test]
fn parse_errors() {
    assert_failure("f(1,", "UNEXPECTED_END_OF_INPUT");
    assert_failure("x <- )", "UNEXPECTED_TOKEN");
    assert_failure("x <- 1.5L", "INVALID_LITERAL");
}

#[test]
fn printing() {
    assert_eq!(printed("print(1:3)"), vec!["[1] 1 2 3"]);
    assert_eq!(printed("print(c(first = 1, b = 22))"), vec!["first     b", "    1    22"]);
    assert_eq!(printed("print(NULL)"), vec!["NULL"]);
    assert_eq!(printed("print(c(\"a\", NA))"), vec!["[1] \"a\"  NA"]);
}

#[test]
fn text_connections() {
    assert_success("con <- textConnection(c(\"one\", \"two\", \"three\"))\n\
                    stopifnot(identical(readLines(con, 2), c(\"one\", \"two\")))\n\
                    stopifnot(identical(readLines(con), \"three\"))\n\
                    close(con)");
    assert_eq!(printed("writeLines(c(\"a\", \"b\"))\nflush(stdout())"), vec!["a", "b"]);
}

#[test]
fn arguments_are_evaluated_in_formal_order() {
    assert_success("trail <- character(0)\n\
                    f <- function(a, b) NULL\n\
                    f(b = { trail <- c(trail, \"b\"); 1 }, a = { trail <- c(trail, \"a\"); 2 })\n\
                    stopifnot(identical(trail, c(\"a\", \"b\")))");
}

#[test]
fn native_calls_need_a_registry() {
    assert_failure(".Call(\"C_routine\", 1)", "NATIVE_CALL");
}

struct ArgumentCounter;

impl NativeCall for ArgumentCounter {
    fn invoke(&self, symbol: &str, args: &[Value]) -> Result<Value, String> {
        match symbol {
            "C_count" => Ok(Value::integer(i32::try_from(args.len()).map_err(|e| e.to_string())?)),
            other => Err(format!("unknown routine '{other}'")),
        }
    }
}

#[test]
fn native_calls_reach_the_registered_routines() {
    let mut ctx = Context::new();
    ctx.set_native_call(Rc::new(ArgumentCounter));
    let value = ctx.run(".Call(\"C_count\", 1, \"a\", TRUE)").expect("native call failed");
    assert_eq!(format!("{value:?}"), "3L");
    let error = ctx.run(".Call(\"C_missing\")").expect_err("unknown routine succeeded");
    assert_eq!(error.id(), "NATIVE_CALL");
}

#[test]
fn options_can_be_set_from_rust() {
    let options = Options { partial_matching: false,
                            ..Options::default() };
    let mut ctx = Context::new().with_options(options);
    let error = ctx.run("f <- function(value) value\nf(val = 1)").expect_err("partial match succeeded");
    assert_eq!(error.id(), "UNUSED_ARGUMENT");
}

#[test]
fn contexts_are_independent_across_threads() {
    let handles: Vec<_> = (0..2).map(|i| {
                                    std::thread::spawn(move || {
                                        let src = format!("x <- {i}\nf <- function(y) x + y\nf(10)");
                                        let evaluation = evaluate(&src).expect("script failed");
                                        format!("{:?}", evaluation.value)
                                    })
                                })
                                .collect();
    let results: Vec<String> = handles.into_iter().map(|h| h.join().expect("thread panicked")).collect();
    assert_eq!(results, vec!["10", "11"]);
}
