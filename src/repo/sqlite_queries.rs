//! Raw SQL used by the sqlite repository implementation.

pub const QUERY_GET_USER_BY_EMAIL: &str = "
SELECT id, full_name, email, password_hash, role, is_enabled, created_at, updated_at
FROM user_app
WHERE email = $1;
";

pub const QUERY_GET_PET: &str = "
SELECT id, pet_name, species, breed, birthday, tutor_id, clinic_id, created_at, updated_at
FROM pet
WHERE id = $1;
";

pub const QUERY_GET_VETERINARIAN: &str = "
SELECT id, full_name, crmv, specialty, clinic_id, is_active, created_at, updated_at
FROM veterinarian
WHERE id = $1;
";

pub const QUERY_GET_SERVICE: &str = "
SELECT id, service_name, description, base_price, duration_min, clinic_id, is_active,
       created_at, updated_at
FROM service
WHERE id = $1;
";

/// Full half-open interval overlap against the veterinarian's blocking
/// (scheduled/confirmed) appointments: an existing window `[s, s+d)`
/// collides with `[$2, $3)` iff `s < $3` and `s+d > $2`.
pub const QUERY_FIND_OVERLAPPING_APPOINTMENTS: &str = "
SELECT a.id, a.pet_id, a.veterinarian_id, a.service_id, a.scheduled_at, a.notes, a.status,
       a.created_at, a.updated_at
FROM appointment a
JOIN service s ON s.id = a.service_id
WHERE a.veterinarian_id = $1
  AND a.status IN ('scheduled', 'confirmed')
  AND datetime(a.scheduled_at, '+' || s.duration_min || ' minutes') > datetime($2)
  AND datetime(a.scheduled_at) < datetime($3)
ORDER BY datetime(a.scheduled_at) ASC;
";

pub const QUERY_INSERT_APPOINTMENT: &str = "
INSERT INTO appointment(pet_id, veterinarian_id, service_id, scheduled_at, notes, status,
                        created_at, updated_at)
VALUES($1, $2, $3, $4, $5, 'scheduled', $6, $7);
";

pub const QUERY_GET_APPOINTMENT: &str = "
SELECT id, pet_id, veterinarian_id, service_id, scheduled_at, notes, status,
       created_at, updated_at
FROM appointment
WHERE id = $1;
";

pub const QUERY_UPDATE_APPOINTMENT_STATUS: &str = "
UPDATE appointment
SET status = $1,
    notes = COALESCE($2, notes),
    updated_at = $3
WHERE id = $4;
";

/// Shared projection for appointment detail responses; the list query
/// appends its filters to this base.
pub const QUERY_APPOINTMENT_DETAIL_BASE: &str = "
SELECT a.id, a.pet_id, a.veterinarian_id, a.service_id, a.scheduled_at, a.notes, a.status,
       a.created_at, a.updated_at,
       p.pet_name, p.species, u.id AS tutor_id, u.full_name AS tutor_name,
       v.full_name AS vet_name, v.crmv, v.specialty,
       s.service_name, s.base_price, s.duration_min,
       pay.id AS payment_id, pay.amount AS payment_amount, pay.method AS payment_method,
       pay.status AS payment_status, pay.paid_at AS payment_paid_at
FROM appointment a
JOIN pet p ON p.id = a.pet_id
JOIN user_app u ON u.id = p.tutor_id
JOIN veterinarian v ON v.id = a.veterinarian_id
JOIN service s ON s.id = a.service_id
LEFT JOIN payment pay ON pay.appointment_id = a.id
WHERE 1 = 1";
