mod booking_test;
mod dashboard_test;
mod slot_test;
