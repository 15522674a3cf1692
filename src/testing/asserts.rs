// Copyright 2023-5 Seth Pendergrass. See LICENSE.

//! Extra asserts to make tests shorter / more readable.

#[macro_export]
macro_rules! assert_approx {
  ($actual:expr, $expected:expr) => {{
    let actual: f64 = $actual;
    let expected: f64 = $expected;

    assert!(
      (actual - expected).abs() < 1e-9,
      "Values are not approximately equal:\nActual:   {actual}\nExpected: {expected}"
    );
  }};
}

#[macro_export]
macro_rules! assert_err {
  ($res:expr, $msg:literal) => {{
    let Err(e) = $res else {
      panic!("Unexpected `Ok`.");
    };

    assert!(
      e.contains($msg),
      "Error message did not contain expected substring.\nActual:\n{e}\nExpected:\n{}",
      $msg
    );
  }};
}
