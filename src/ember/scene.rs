use nalgebra::{Point3, Vector3};
use rand::{Rng, SeedableRng};
use rand_xoshiro::Xoshiro256StarStar;

use crate::util::random_unit;

/// 필러 구가 들어오지 못하게 비워두는 자리. 앵커 구 아래쪽, 필러 구와 같은 높이.
pub const CLEARANCE_CENTERS: [[f32; 3]; 3] = [[4.0, 0.2, 0.0], [0.0, 0.2, 0.0], [-4.0, 0.2, 0.0]];
pub const CLEARANCE_RADIUS: f32 = 0.9;

pub const FILLER_RADIUS: f32 = 0.2;
pub const GRID_MIN: i32 = -11;
pub const GRID_MAX: i32 = 11;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Material {
    Diffuse { albedo: Vector3<f32> },
    Reflective { albedo: Vector3<f32>, fuzz: f32 },
    Refractive { refractive_index: f32 },
}

impl Material {
    /// 커널이 쓰는 재질 코드
    pub fn kind(&self) -> u32 {
        match self {
            Material::Diffuse { .. } => 0,
            Material::Reflective { .. } => 1,
            Material::Refractive { .. } => 2,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sphere {
    pub center: Point3<f32>,
    pub radius: f32,
    pub material: Material,
}

impl Default for Sphere {
    fn default() -> Self {
        Self {
            center: Point3::origin(),
            radius: 1.0,
            material: Material::Diffuse {
                albedo: Vector3::new(1.0, 1.0, 1.0),
            },
        }
    }
}

/// 시작할 때 한 번 만들고 이후로는 읽기만 함
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Scene {
    pub spheres: Vec<Sphere>,
}

impl Scene {
    pub fn len(&self) -> usize {
        self.spheres.len()
    }

    pub fn is_empty(&self) -> bool {
        self.spheres.is_empty()
    }
}

fn clear_of_anchors(center: &Point3<f32>) -> bool {
    CLEARANCE_CENTERS
        .iter()
        .all(|anchor| (center - Point3::from(*anchor)).magnitude() > CLEARANCE_RADIUS)
}

/// 바닥 구 하나, 22x22 격자의 필러 구들, 마지막에 앵커 구 세 개.
///
/// 같은 난수 생성기가 격자 전체를 순서대로 돌기 때문에 (a, b) 순회 순서도 결과의 일부임.
/// 셀마다 위치 지터 2번, 통과하면 재질 선택 1번, 그 뒤 재질별로 추가로 뽑음.
pub fn build_final_scene(seed: u64) -> Scene {
    let mut rng = Xoshiro256StarStar::seed_from_u64(seed);
    let mut spheres = Vec::with_capacity(1 + (GRID_MAX - GRID_MIN).pow(2) as usize + 3);

    spheres.push(Sphere {
        center: Point3::new(0.0, -1000.0, 0.0),
        radius: 1000.0,
        material: Material::Diffuse {
            albedo: Vector3::new(0.5, 0.5, 0.5),
        },
    });

    for a in GRID_MIN..GRID_MAX {
        for b in GRID_MIN..GRID_MAX {
            let x = a as f32 + 0.9 * rng.gen::<f32>();
            let z = b as f32 + 0.9 * rng.gen::<f32>();
            let center = Point3::new(x, FILLER_RADIUS, z);

            if !clear_of_anchors(&center) {
                continue;
            }

            let choose = rng.gen::<f32>();
            let material = if choose < 0.8 {
                // 두 번 곱해서 어둡고 진한 색 쪽으로 치우침
                let albedo = random_unit(&mut rng).component_mul(&random_unit(&mut rng));
                Material::Diffuse { albedo }
            } else if choose < 0.95 {
                // 0.5 + 0.5 × 균등값, 퍼짐은 0.5 × 균등값
                let albedo = random_unit(&mut rng).map(|c| 0.5 + 0.5 * c);
                let fuzz = 0.5 * rng.gen::<f32>();
                Material::Reflective { albedo, fuzz }
            } else {
                Material::Refractive {
                    refractive_index: 1.5,
                }
            };

            spheres.push(Sphere {
                center,
                radius: FILLER_RADIUS,
                material,
            });
        }
    }

    spheres.push(Sphere {
        center: Point3::new(0.0, 1.0, 0.0),
        radius: 1.0,
        material: Material::Refractive {
            refractive_index: 1.5,
        },
    });
    spheres.push(Sphere {
        center: Point3::new(-4.0, 1.0, 0.0),
        radius: 1.0,
        material: Material::Diffuse {
            albedo: Vector3::new(0.4, 0.2, 0.1),
        },
    });
    spheres.push(Sphere {
        center: Point3::new(4.0, 1.0, 0.0),
        radius: 1.0,
        material: Material::Reflective {
            albedo: Vector3::new(0.7, 0.6, 0.5),
            fuzz: 0.0,
        },
    });

    log::debug!("built scene with {} spheres (seed {})", spheres.len(), seed);

    Scene { spheres }
}
