use nalgebra::Vector3;
use rand::Rng;

/// [0, 1) 균등분포 벡터. 성분은 x, y, z 순서로 뽑으며 이 순서가 곧 난수 소비 순서임.
pub fn random_unit<G: Rng + ?Sized>(rng: &mut G) -> Vector3<f32> {
    let x = rng.gen::<f32>();
    let y = rng.gen::<f32>();
    let z = rng.gen::<f32>();
    Vector3::new(x, y, z)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_xoshiro::Xoshiro256StarStar;

    #[test]
    fn random_unit_consumes_three_draws() {
        let mut a = Xoshiro256StarStar::seed_from_u64(11);
        let mut b = Xoshiro256StarStar::seed_from_u64(11);

        let v = random_unit(&mut a);
        let expected = Vector3::new(b.gen::<f32>(), b.gen::<f32>(), b.gen::<f32>());
        assert_eq!(v, expected);
        assert_eq!(a.gen::<u64>(), b.gen::<u64>());
    }
}
