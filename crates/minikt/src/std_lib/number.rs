use minikt_macros::builtin;

use crate::primitive::Primitive;
use crate::std_lib::{BuiltinError, BuiltinResult, args, checked};

/// Integer sum from 1 to n.
#[builtin]
pub fn sum_of_numbers(arguments: Vec<i64>) -> BuiltinResult {
    let n = args!(arguments; n);
    let product = checked(n.checked_mul(checked(n.checked_add(1))?))?;
    Ok(Primitive::Integer(product / 2))
}

/// Factorial of n.
#[builtin]
pub fn factorial(arguments: Vec<i64>) -> BuiltinResult {
    let n = args!(arguments; n);
    let mut result: i64 = 1;
    for factor in 2..=n {
        result = checked(result.checked_mul(factor))?;
    }
    Ok(Primitive::Integer(result))
}

/// Greatest common divisor of a and b.
#[builtin]
pub fn gcd(arguments: Vec<i64>) -> BuiltinResult {
    let (mut a, mut b) = args!(arguments; a, b);
    while b != 0 {
        (a, b) = (b, checked(a.checked_rem(b))?);
    }
    Ok(Primitive::Integer(a))
}

/// Reverse digits of n.
#[builtin]
pub fn reverse(arguments: Vec<i64>) -> BuiltinResult {
    let n = args!(arguments; n);
    reverse_digits(n).map(Primitive::Integer)
}

/// Checks if n is prime.
#[builtin]
pub fn prime_checker(arguments: Vec<i64>) -> BuiltinResult {
    let n = args!(arguments; n);
    Ok(Primitive::from(is_prime(n)))
}

/// Checks if n is a palindrome.
#[builtin]
pub fn palindrome_checker(arguments: Vec<i64>) -> BuiltinResult {
    let n = args!(arguments; n);
    Ok(Primitive::from(n == reverse_digits(n)?))
}

/// Finds the largest digit in n.
#[builtin]
pub fn largest_digit(arguments: Vec<i64>) -> BuiltinResult {
    let n = args!(arguments; n);
    let largest = digits(n).fold(0, i64::max);
    Ok(Primitive::Integer(largest))
}

/// Sums the digits of n.
#[builtin]
pub fn sum_of_digits(arguments: Vec<i64>) -> BuiltinResult {
    let n = args!(arguments; n);
    Ok(Primitive::Integer(digits(n).sum()))
}

/// Multiplication table of n up to 10.
#[builtin]
pub fn multiplication_table(arguments: Vec<i64>) -> BuiltinResult {
    let n = args!(arguments; n);
    let rows = (1..=10)
        .map(|i| checked(n.checked_mul(i)).map(|product| format!("{} x {} = {}", n, i, product)))
        .collect::<Result<Vec<_>, BuiltinError>>()?;
    Ok(Primitive::Text(rows.join("\n")))
}

/// Fibonacci number at position n.
#[builtin]
pub fn fibonacci_pos(arguments: Vec<i64>) -> BuiltinResult {
    let n = args!(arguments; n);
    if n <= 1 {
        return Ok(Primitive::Integer(n));
    }

    let (mut a, mut b): (i64, i64) = (0, 1);
    for _ in 2..=n {
        (a, b) = (b, checked(a.checked_add(b))?);
    }
    Ok(Primitive::Integer(b))
}

// Digits keep the sign of n, so negative numbers yield negative digits.
fn digits(mut n: i64) -> impl Iterator<Item = i64> {
    std::iter::from_fn(move || {
        if n == 0 {
            return None;
        }
        let digit = n % 10;
        n /= 10;
        Some(digit)
    })
}

fn reverse_digits(n: i64) -> Result<i64, BuiltinError> {
    digits(n).try_fold(0i64, |reversed, digit| {
        checked(reversed.checked_mul(10).and_then(|value| value.checked_add(digit)))
    })
}

/// Deterministic Miller-Rabin. Testing against the first twelve primes as
/// witnesses is exact for every 64-bit input.
fn is_prime(n: i64) -> bool {
    const WITNESSES: [u64; 12] = [2, 3, 5, 7, 11, 13, 17, 19, 23, 29, 31, 37];

    if n < 2 {
        return false;
    }
    let n = n as u64;
    for p in WITNESSES {
        if n % p == 0 {
            return n == p;
        }
    }

    let mut d = n - 1;
    let mut s = 0;
    while d % 2 == 0 {
        d /= 2;
        s += 1;
    }

    'witness: for a in WITNESSES {
        let mut x = pow_mod(a, d, n);
        if x == 1 || x == n - 1 {
            continue;
        }
        for _ in 1..s {
            x = mul_mod(x, x, n);
            if x == n - 1 {
                continue 'witness;
            }
        }
        return false;
    }
    true
}

fn mul_mod(a: u64, b: u64, modulus: u64) -> u64 {
    ((a as u128 * b as u128) % modulus as u128) as u64
}

fn pow_mod(mut base: u64, mut exponent: u64, modulus: u64) -> u64 {
    let mut result = 1;
    base %= modulus;
    while exponent > 0 {
        if exponent & 1 == 1 {
            result = mul_mod(result, base, modulus);
        }
        base = mul_mod(base, base, modulus);
        exponent >>= 1;
    }
    result
}
