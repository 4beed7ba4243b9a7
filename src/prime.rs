//! Prime sizing for bucket arrays.

/// Trial division over 6k +/- 1 candidates.
pub fn is_prime(n: usize) -> bool {
    if n <= 1 {
        return false;
    }
    if n <= 3 {
        return true;
    }
    if n % 2 == 0 || n % 3 == 0 {
        return false;
    }
    let mut i = 5usize;
    // `i <= n / i` instead of `i * i <= n` so large `n` cannot overflow.
    while i <= n / i {
        if n % i == 0 || n % (i + 2) == 0 {
            return false;
        }
        i += 6;
    }
    true
}

/// Smallest prime strictly greater than `n`, or 2 when `n <= 1`.
///
/// A prime `n` is never returned for itself: `next_prime_at_least(7) == 11`.
pub fn next_prime_at_least(n: usize) -> usize {
    if n <= 1 {
        return 2;
    }
    let mut candidate = n;
    loop {
        candidate += 1;
        if is_prime(candidate) {
            return candidate;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Invariant: `is_prime` agrees with a naive divisor scan on small inputs.
    #[test]
    fn is_prime_matches_naive_scan() {
        for n in 0..2_000usize {
            let naive = n >= 2 && (2..n).all(|d| n % d != 0);
            assert_eq!(is_prime(n), naive, "n = {n}");
        }
    }

    /// Invariant: hints of 0 and 1 both size to 2 buckets.
    #[test]
    fn small_hints_give_two() {
        assert_eq!(next_prime_at_least(0), 2);
        assert_eq!(next_prime_at_least(1), 2);
    }

    /// Invariant: the result is always strictly greater than a hint above 1,
    /// even when the hint is itself prime.
    #[test]
    fn result_is_strictly_greater() {
        assert_eq!(next_prime_at_least(2), 3);
        assert_eq!(next_prime_at_least(3), 5);
        assert_eq!(next_prime_at_least(5), 7);
        assert_eq!(next_prime_at_least(7), 11);
        assert_eq!(next_prime_at_least(8), 11);
        assert_eq!(next_prime_at_least(24), 29);
        assert_eq!(next_prime_at_least(7919), 7927);
    }

    /// Invariant: large candidates do not overflow the trial-division bound.
    #[test]
    fn large_values_do_not_overflow() {
        assert!(is_prime(4_294_967_291));
        assert!(!is_prime(4_294_967_295));
        assert_eq!(next_prime_at_least(4_294_967_279), 4_294_967_291);
    }
}
