mod common;

use cinder::ErrorKind;

eval_tests! {
    // lists
    cons_onto_list: "(cons 1 '(2 3))" => "(1 2 3)",
    cons_dotted: "(cons 1 2)" => "(1 . 2)",
    list_builds: "(list 1 (+ 1 1) 'three)" => "(1 2 three)",
    list_empty: "(list)" => "()",
    length_counts: "(length '(a b c d))" => "4",
    append_lists: "(append '(1 2) '(3) '() '(4 5))" => "(1 2 3 4 5)",
    append_dotted_tail: "(append '(1) 2)" => "(1 . 2)",
    reverse_list: "(reverse '(1 2 3))" => "(3 2 1)",
    list_ref_index: "(list-ref '(a b c) 1)" => "b",

    // predicates
    null_on_nil: "(null? '())" => "#t",
    pair_on_list: "(pair? '(1))" => "#t",
    list_on_dotted: "(list? '(1 . 2))" => "#f",
    atom_on_symbol: "(atom? 'x)" => "#t",
    procedure_on_lambda: "(procedure? (lambda () 1))" => "#t",
    integer_on_fraction: "(integer? 2.5)" => "#f",
    rational_on_rational: "(rational? (rational 1 2))" => "#t",
    matrix_on_matrix: "(matrix? (identity 2))" => "#t",

    // numbers
    exact_sum: "(+ (rational 1 2) (rational 1 3))" => "5/6",
    exact_collapses_to_integer: "(* (rational 2 3) (rational 3 2))" => "1",
    mixed_sum_is_inexact: "(+ (rational 1 2) 0.25)" => "0.75",
    exact_division: "(/ (rational 1 2) (rational 3 4))" => "2/3",
    exact_expt: "(expt (rational 2 3) (rational 2))" => "4/9",
    inexact_expt: "(expt 2 10)" => "1024",
    abs_negative: "(abs -4.5)" => "4.5",
    round_half: "(round 2.5)" => "3",
    quotient_truncates: "(quotient -7 2)" => "-3",
    quotient_at_minimum: "(quotient -9223372036854775808 2)" => "-4611686018427387904",
    exact_expt_unit_base_large_power: "(expt (rational -1) (rational 9007199254740991))" => "-1",
    negate_large_rational: "(- (rational -4611686018427387904 1))" => "4611686018427387904",
    exact_to_inexact: "(exact->inexact (rational 1 4))" => "0.25",
    inexact_to_exact: "(inexact->exact 0.5)" => "1/2",
    numerator_reduced: "(numerator (rational 4 6))" => "2",
    denominator_reduced: "(denominator (rational 4 6))" => "3",
    compare_chain: "(< 1 2 3 4)" => "#t",
    compare_rational: "(= (rational 1 2) 0.5)" => "#t",
    even_number: "(even? 10)" => "#t",
    zero_rational: "(zero? (rational 0 5))" => "#t",

    // equality
    equal_structural: "(equal? '(1 (2)) '(1 (2)))" => "#t",
    eq_symbols: "(eq? 'a 'a)" => "#t",
    eq_distinct_lists: "(eq? '(1) '(1))" => "#f",
    not_false: "(not #f)" => "#t",

    // strings and symbols
    string_append: "(string-append \"ab\" \"cd\")" => "\"abcd\"",
    string_length: "(string-length \"hello\")" => "5",
    number_to_string: "(number->string 42)" => "\"42\"",
    string_to_number: "(string->number \"2.5\")" => "2.5",
    string_to_number_fails: "(string->number \"x1\")" => "#f",
    symbol_to_string: "(symbol->string 'abc)" => "\"abc\"",
    string_to_symbol: "(string->symbol \"abc\")" => "abc",

    // matrices
    matrix_sum: "(+ (matrix '(1 2) '(3 4)) (identity 2))" => "[[2 2] [3 5]]",
    matrix_difference: "(- (matrix '(1 2) '(3 4)) (matrix '(1 1) '(1 1)))" => "[[0 1] [2 3]]",
    matrix_product: "(* (matrix '(1 2) '(3 4)) (matrix '(5 6) '(7 8)))" => "[[19 22] [43 50]]",
    matrix_scaled: "(* 2 (matrix '(1 2) '(3 4)))" => "[[2 4] [6 8]]",
    matrix_negated: "(- (matrix '(1 -2)))" => "[[-1 2]]",
    matrix_transpose: "(transpose (matrix '(1 2 3)))" => "[[1] [2] [3]]",
    matrix_trace: "(trace (matrix '(1 2) '(3 4)))" => "5",
    matrix_det: "(det (matrix '(4 7) '(2 6)))" => "10",
    matrix_rank: "(rank (matrix '(1 2) '(2 4)))" => "1",
    matrix_inverse: "(inverse (matrix '(2 0) '(0 4)))" => "[[0.5 0] [0 0.25]]",
    matrix_ref: "(matrix-ref (matrix '(1 2) '(3 4)) 0 1)" => "2",
    matrix_shape: "(list (rows (matrix '(1 2 3))) (cols (matrix '(1 2 3))))" => "(1 3)",
    matrix_hadamard: "(hadamard (matrix '(1 2)) (matrix '(3 4)))" => "[[3 8]]",
    matrix_from_row_list: "(matrix '((1 2) (3 4)))" => "[[1 2] [3 4]]",
}

eval_err_tests! {
    car_of_nil: "(car '())" => ErrorKind::Lisp,
    cdr_of_number: "(cdr 5)" => ErrorKind::Lisp,
    length_of_dotted: "(length '(1 . 2))" => ErrorKind::Lisp,
    list_ref_out_of_range: "(list-ref '(1 2) 5)" => ErrorKind::Lisp,
    add_string: "(+ 1 \"a\")" => ErrorKind::Lisp,
    float_division_by_zero: "(/ 1 0)" => ErrorKind::Lisp,
    exact_division_by_zero: "(/ (rational 1 2) (rational 0))" => ErrorKind::Math,
    modulo_by_zero: "(modulo 5 0)" => ErrorKind::Lisp,
    quotient_of_fraction: "(quotient 5.5 2)" => ErrorKind::Lisp,
    zero_to_zero: "(expt 0 0)" => ErrorKind::Lisp,
    rational_zero_denominator: "(rational 3 0)" => ErrorKind::Math,
    ragged_matrix: "(matrix '(1 2) '(3))" => ErrorKind::Math,
    matrix_plus_scalar: "(+ 1 (identity 2))" => ErrorKind::Math,
    product_shape_mismatch: "(* (matrix '(1 2)) (matrix '(1 2)))" => ErrorKind::Math,
    trace_non_square: "(trace (matrix '(1 2)))" => ErrorKind::Math,
    singular_inverse: "(inverse (matrix '(1 1) '(1 1)))" => ErrorKind::Math,
    matrix_ref_out_of_bounds: "(matrix-ref (identity 2) 2 0)" => ErrorKind::Math,
    user_error: "(error \"custom\" 'failure)" => ErrorKind::Lisp,
    error_without_message: "(error)" => ErrorKind::Lisp,
    exit_out_of_range: "(exit 300)" => ErrorKind::Lisp,
    newline_with_args: "(newline 1)" => ErrorKind::Lisp,
    reduce_empty: "(reduce + '())" => ErrorKind::Lisp,
    map_over_non_list: "(map car 5)" => ErrorKind::Lisp,
    quotient_overflow: "(quotient -9223372036854775808 -1)" => ErrorKind::Lisp,
    remainder_overflow: "(remainder -9223372036854775808 -1)" => ErrorKind::Lisp,
    modulo_overflow: "(modulo -9223372036854775808 -1)" => ErrorKind::Lisp,
    negate_minimum_rational: "(- (rational -9223372036854775808 1))" => ErrorKind::Math,
    abs_minimum_rational: "(abs (rational -9223372036854775808 1))" => ErrorKind::Math,
    quotient_beyond_i64: "(quotient 1000000000000000000000000000000 1)" => ErrorKind::Math,
    rational_beyond_i64: "(rational 1000000000000000000000000000000 1)" => ErrorKind::Math,
    list_ref_beyond_i64: "(list-ref '(1) 1000000000000000000000000000000)" => ErrorKind::Math,
    exact_expt_overflow: "(expt (rational 2) (rational 100))" => ErrorKind::Math,
    identity_too_large: "(identity 5000)" => ErrorKind::Math,
}
