use glam::DVec3;

use super::mesh::MeshData;

/// A ray in world space
#[derive(Debug, Clone, Copy)]
pub struct Ray {
    pub origin: DVec3,
    pub direction: DVec3,
}

impl Ray {
    pub fn new(origin: DVec3, direction: DVec3) -> Self {
        Self {
            origin,
            direction: direction.normalize_or_zero(),
        }
    }

    /// Point at distance `t` along the ray
    pub fn at(&self, t: f64) -> DVec3 {
        self.origin + self.direction * t
    }
}

/// Axis-aligned bounding box
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    pub min: DVec3,
    pub max: DVec3,
}

impl Aabb {
    /// Bounding box of a point set; None if empty
    pub fn from_points<'a>(points: impl IntoIterator<Item = &'a DVec3>) -> Option<Self> {
        let mut iter = points.into_iter();
        let first = *iter.next()?;
        let (min, max) = iter.fold((first, first), |(min, max), p| (min.min(*p), max.max(*p)));
        Some(Self { min, max })
    }

    /// Compute AABB from MeshData positions
    pub fn from_mesh(data: &MeshData) -> Option<Self> {
        Self::from_points(&data.positions)
    }

    /// Center of the bounding box
    pub fn center(&self) -> DVec3 {
        (self.min + self.max) * 0.5
    }

    pub fn size(&self) -> DVec3 {
        self.max - self.min
    }

    /// Grow the box by `margin` on every side
    pub fn expanded(&self, margin: f64) -> Self {
        Self {
            min: self.min - DVec3::splat(margin),
            max: self.max + DVec3::splat(margin),
        }
    }
}

/// Ray-AABB intersection using the slab method.
/// Returns the distance along the ray to the nearest hit, or None.
pub fn ray_aabb(ray: &Ray, aabb: &Aabb) -> Option<f64> {
    let inv_dir = ray.direction.recip();

    let t1 = (aabb.min.x - ray.origin.x) * inv_dir.x;
    let t2 = (aabb.max.x - ray.origin.x) * inv_dir.x;
    let t3 = (aabb.min.y - ray.origin.y) * inv_dir.y;
    let t4 = (aabb.max.y - ray.origin.y) * inv_dir.y;
    let t5 = (aabb.min.z - ray.origin.z) * inv_dir.z;
    let t6 = (aabb.max.z - ray.origin.z) * inv_dir.z;

    let tmin = t1.min(t2).max(t3.min(t4)).max(t5.min(t6));
    let tmax = t1.max(t2).min(t3.max(t4)).min(t5.max(t6));

    if tmax < 0.0 || tmin > tmax {
        return None;
    }

    Some(if tmin < 0.0 { tmax } else { tmin })
}

/// Möller-Trumbore ray-triangle intersection algorithm.
/// Returns the distance along the ray if hit, or None if no intersection.
/// Both windings count as a hit.
pub fn ray_triangle_intersect(ray: &Ray, v0: DVec3, v1: DVec3, v2: DVec3) -> Option<f64> {
    const EPSILON: f64 = 1e-12;

    let edge1 = v1 - v0;
    let edge2 = v2 - v0;
    let h = ray.direction.cross(edge2);
    let a = edge1.dot(h);

    // Ray is parallel to triangle
    if a.abs() < EPSILON {
        return None;
    }

    let f = 1.0 / a;
    let s = ray.origin - v0;
    let u = f * s.dot(h);

    if !(0.0..=1.0).contains(&u) {
        return None;
    }

    let q = s.cross(edge1);
    let v = f * ray.direction.dot(q);

    if v < 0.0 || u + v > 1.0 {
        return None;
    }

    let t = f * edge2.dot(q);

    // Intersection is behind ray origin
    if t > EPSILON {
        Some(t)
    } else {
        None
    }
}

/// Nearest triangle hit distance of a world-space mesh, with an AABB
/// broad-phase rejection first.
pub fn ray_mesh(ray: &Ray, mesh: &MeshData) -> Option<f64> {
    let aabb = Aabb::from_mesh(mesh)?;
    // Flat meshes have a zero-thickness box; pad it so the slab test still passes
    ray_aabb(ray, &aabb.expanded(1e-9))?;

    mesh.triangles()
        .filter_map(|[a, b, c]| ray_triangle_intersect(ray, a, b, c))
        .min_by(|a, b| a.total_cmp(b))
}

/// Intersect a ray with the plane through `point` with normal `normal`.
/// Returns None if the ray is parallel to the plane or the hit is behind the origin.
pub fn ray_plane(ray: &Ray, point: DVec3, normal: DVec3) -> Option<DVec3> {
    let denom = ray.direction.dot(normal);
    if denom.abs() < 1e-9 {
        return None;
    }

    let t = (point - ray.origin).dot(normal) / denom;
    if t < 0.0 {
        return None;
    }

    Some(ray.at(t))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn down_ray(x: f64, z: f64) -> Ray {
        Ray::new(DVec3::new(x, 10.0, z), DVec3::NEG_Y)
    }

    #[test]
    fn test_ray_aabb_hit_and_miss() {
        let aabb = Aabb {
            min: DVec3::splat(-1.0),
            max: DVec3::splat(1.0),
        };
        let hit = ray_aabb(&down_ray(0.0, 0.0), &aabb).unwrap();
        assert!((hit - 9.0).abs() < 1e-9);
        assert!(ray_aabb(&down_ray(5.0, 0.0), &aabb).is_none());
    }

    #[test]
    fn test_ray_aabb_origin_inside() {
        let aabb = Aabb {
            min: DVec3::splat(-1.0),
            max: DVec3::splat(1.0),
        };
        let ray = Ray::new(DVec3::ZERO, DVec3::X);
        assert!((ray_aabb(&ray, &aabb).unwrap() - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_ray_triangle_both_windings() {
        let a = DVec3::new(-1.0, 0.0, -1.0);
        let b = DVec3::new(1.0, 0.0, -1.0);
        let c = DVec3::new(0.0, 0.0, 1.0);
        let ray = down_ray(0.0, 0.0);
        assert!((ray_triangle_intersect(&ray, a, b, c).unwrap() - 10.0).abs() < 1e-9);
        assert!((ray_triangle_intersect(&ray, a, c, b).unwrap() - 10.0).abs() < 1e-9);
        assert!(ray_triangle_intersect(&down_ray(3.0, 0.0), a, b, c).is_none());
    }

    #[test]
    fn test_ray_triangle_behind_origin() {
        let ray = Ray::new(DVec3::new(0.0, -1.0, 0.0), DVec3::NEG_Y);
        let hit = ray_triangle_intersect(
            &ray,
            DVec3::new(-1.0, 0.0, -1.0),
            DVec3::new(1.0, 0.0, -1.0),
            DVec3::new(0.0, 0.0, 1.0),
        );
        assert!(hit.is_none());
    }

    #[test]
    fn test_ray_mesh_flat_quad() {
        let mut m = MeshData::new();
        for p in [
            DVec3::new(-1.0, 0.0, -1.0),
            DVec3::new(1.0, 0.0, -1.0),
            DVec3::new(1.0, 0.0, 1.0),
            DVec3::new(-1.0, 0.0, 1.0),
        ] {
            m.push_vertex(p);
        }
        m.push_quad(0, 1, 2, 3);
        assert!((ray_mesh(&down_ray(0.5, 0.5), &m).unwrap() - 10.0).abs() < 1e-9);
        assert!(ray_mesh(&down_ray(2.0, 0.0), &m).is_none());
    }

    #[test]
    fn test_ray_plane() {
        let p = ray_plane(&down_ray(2.0, 3.0), DVec3::ZERO, DVec3::Y).unwrap();
        assert!((p - DVec3::new(2.0, 0.0, 3.0)).length() < 1e-9);
        let parallel = Ray::new(DVec3::Y, DVec3::X);
        assert!(ray_plane(&parallel, DVec3::ZERO, DVec3::Y).is_none());
        let away = Ray::new(DVec3::Y, DVec3::Y);
        assert!(ray_plane(&away, DVec3::ZERO, DVec3::Y).is_none());
    }

    #[test]
    fn test_aabb_from_points() {
        let pts = [DVec3::new(1.0, 2.0, 3.0), DVec3::new(-1.0, 0.0, 5.0)];
        let aabb = Aabb::from_points(&pts).unwrap();
        assert_eq!(aabb.min, DVec3::new(-1.0, 0.0, 3.0));
        assert_eq!(aabb.max, DVec3::new(1.0, 2.0, 5.0));
        assert_eq!(aabb.center(), DVec3::new(0.0, 1.0, 4.0));
        assert!(Aabb::from_points(&[]).is_none());
    }
}
