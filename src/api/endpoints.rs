//! Backend endpoint paths, relative to the configured base URL

pub const REVIEWS_DETAILS: &str = "/course/getReviews";
pub const SHOW_ALL_CATEGORIES: &str = "/course/showAllCategories";
pub const CREATE_CATEGORY: &str = "/course/createCategory";
pub const ENROLL_FREE_COURSE: &str = "/course/enrollFreeCourse";

pub const COURSE_PAYMENT: &str = "/payment/capturePayment";
pub const COURSE_VERIFY: &str = "/payment/verifyPayment";
pub const SEND_PAYMENT_SUCCESS_EMAIL: &str = "/payment/sendPaymentSuccessEmail";
